use mongodb::{Client, options::ClientOptions};
use tracing::{info, instrument};

use super::{MongoConfig, health::ping};
use crate::common::{DatabaseResult, RetryConfig, retry_with_backoff};

/// Copy pool, timeout and naming settings onto parsed client options
fn apply_config(options: &mut ClientOptions, config: &MongoConfig) {
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }
}

/// Connect to MongoDB and verify the server answers a ping
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect};
///
/// let config = MongoConfig::new("mongodb://localhost:27017", "productos");
/// let client = connect(&config).await?;
/// let db = client.database(config.database());
/// ```
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    info!("Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    apply_config(&mut options, config);

    let client = Client::with_options(options)?;
    ping(&client).await?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Connect with exponential backoff, for startup against a database that
/// may still be coming up
pub async fn connect_with_retry(
    config: &MongoConfig,
    retry_config: RetryConfig,
) -> DatabaseResult<Client> {
    retry_with_backoff(|| connect(config), retry_config).await
}
