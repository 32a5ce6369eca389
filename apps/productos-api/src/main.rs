use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use domain_productos::{DEFAULT_CATEGORIAS, MongoCategoriaRepository, MongoProductoRepository};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        database = config.mongodb.database(),
        uploads = %config.uploads_path.display(),
        "Connecting to MongoDB"
    );
    let mongo_client = database::mongodb::connect_with_retry(
        &config.mongodb,
        RetryConfig::new()
            .with_max_retries(5)
            .with_initial_delay(Duration::from_millis(500)),
    )
    .await
    .map_err(|e| eyre::eyre!("MongoDB connection failed: {}", e))?;

    let state = AppState::new(config, mongo_client);

    let productos = MongoProductoRepository::new(&state.db);
    let categorias = MongoCategoriaRepository::new(&state.db);
    tokio::try_join!(productos.init_indexes(), categorias.init_indexes())
        .map_err(|e| eyre::eyre!("Failed to create indexes: {}", e))?;

    if state.config.seed_data {
        let created = api::productos::service(&state)
            .seed_categorias(&DEFAULT_CATEGORIAS)
            .await
            .map_err(|e| eyre::eyre!("Seeding categorias failed: {}", e))?;
        info!("Seeded {} categorias", created.len());
    }

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check that pings MongoDB
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting productos API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB client");
            state.mongo_client.shutdown().await;
            info!("MongoDB client closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Productos API shutdown complete");
    Ok(())
}
