//! Database library providing MongoDB connectors and shared connection utilities
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::mongodb::{MongoConfig, connect_with_retry};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017", "productos");
//! let client = connect_with_retry(&config, RetryConfig::new().with_max_retries(5)).await?;
//! let db = client.database(config.database());
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult, RetryConfig};
