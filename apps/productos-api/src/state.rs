//! Application state management.
//!
//! This module defines the shared application state handed to route builders.
//! The state contains:
//! - Configuration
//! - The MongoDB client and the application database

use database::mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap: the MongoDB client and database handles share one
/// connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client, kept for health checks and shutdown
    pub mongo_client: Client,
    /// Database holding the `productos` and `categorias` collections
    pub db: Database,
}

impl AppState {
    pub fn new(config: crate::config::Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        Self {
            config,
            mongo_client,
            db,
        }
    }
}
