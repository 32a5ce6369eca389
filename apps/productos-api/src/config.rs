use std::path::PathBuf;

use core_config::{AppInfo, FromEnv, app_info, env_bool, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Directory photos are written to when `UPLOADS_PATH` is unset
pub const DEFAULT_UPLOADS_PATH: &str = "./uploads";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Base directory for uploaded photos
    pub uploads_path: PathBuf,
    /// Create the default categorias on startup
    pub seed_data: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME")); // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            uploads_path: PathBuf::from(env_or_default("UPLOADS_PATH", DEFAULT_UPLOADS_PATH)),
            seed_data: env_bool("SEED_DATA", false)?,
        })
    }
}
