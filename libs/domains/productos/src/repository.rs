use async_trait::async_trait;

use crate::error::ProductoResult;
use crate::models::{Categoria, Producto};

/// Repository trait for Producto persistence
///
/// `save` has insert-or-replace semantics keyed by id and returns the
/// persisted form, including a store-assigned id when the input had none.
/// `delete` succeeds silently when the document is already gone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductoRepository: Send + Sync {
    /// List every producto (unordered)
    async fn find_all(&self) -> ProductoResult<Vec<Producto>>;

    /// Get a producto by ID
    async fn find_by_id(&self, id: &str) -> ProductoResult<Option<Producto>>;

    /// Get a producto by exact name
    async fn find_by_nombre(&self, nombre: &str) -> ProductoResult<Option<Producto>>;

    /// Insert or fully replace a producto
    async fn save(&self, producto: Producto) -> ProductoResult<Producto>;

    /// Delete a producto by its id
    async fn delete(&self, producto: &Producto) -> ProductoResult<()>;
}

/// Repository trait for Categoria persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoriaRepository: Send + Sync {
    async fn find_all(&self) -> ProductoResult<Vec<Categoria>>;

    async fn find_by_id(&self, id: &str) -> ProductoResult<Option<Categoria>>;

    async fn find_by_nombre(&self, nombre: &str) -> ProductoResult<Option<Categoria>>;

    async fn save(&self, categoria: Categoria) -> ProductoResult<Categoria>;

    async fn delete(&self, categoria: &Categoria) -> ProductoResult<()>;
}
