//! MongoDB connector and utilities
//!
//! Provides connection management with retry and a readiness ping.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{connect, connect_with_retry};
pub use health::ping;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
