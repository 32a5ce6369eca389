//! Productos Domain
//!
//! Catalogue of productos and their categorias stored in MongoDB, with photo
//! uploads written to local storage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart decoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │     │   Storage   │  ← Photo files
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (traits + MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, response bodies, validation
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_productos::{
//!     handlers,
//!     mongodb::{MongoCategoriaRepository, MongoProductoRepository},
//!     service::ProductoService,
//!     storage::LocalFileStorage,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("productos");
//!
//! let service = ProductoService::new(
//!     MongoProductoRepository::new(&db),
//!     MongoCategoriaRepository::new(&db),
//! );
//! let storage = Arc::new(LocalFileStorage::new("./uploads"));
//!
//! let router = handlers::router(service, storage);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod storage;
pub mod upload;
pub mod validation;

// Re-export commonly used types
pub use error::{ProductoError, ProductoResult};
pub use handlers::{ApiDoc, BASE_PATH, MAX_UPLOAD_BYTES};
pub use models::{Categoria, ErroresValidacion, Producto, ProductoCreado};
pub use mongodb::{MongoCategoriaRepository, MongoProductoRepository};
pub use repository::{CategoriaRepository, ProductoRepository};
pub use service::{DEFAULT_CATEGORIAS, ProductoService};
pub use storage::{FileStorage, LocalFileStorage};
