//! Producto Service - Business logic layer

use std::sync::Arc;

use futures::{Stream, StreamExt, TryStreamExt, stream};
use tracing::{debug, info, instrument};

use crate::error::{ProductoError, ProductoResult};
use crate::models::{Categoria, Producto};
use crate::repository::{CategoriaRepository, ProductoRepository};

/// Extra passes over the catalogue made by the repeat stream
pub const UPPER_CASE_REPEATS: usize = 5000;

/// Categorias created on startup when seeding is enabled
pub const DEFAULT_CATEGORIAS: [&str; 4] = ["Electrónico", "Deporte", "Computación", "Muebles"];

/// Producto service providing catalogue operations over both repositories
pub struct ProductoService<P: ProductoRepository, C: CategoriaRepository> {
    productos: Arc<P>,
    categorias: Arc<C>,
}

impl<P: ProductoRepository, C: CategoriaRepository> ProductoService<P, C> {
    /// Create a new ProductoService with the given repositories
    pub fn new(productos: P, categorias: C) -> Self {
        Self {
            productos: Arc::new(productos),
            categorias: Arc::new(categorias),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> ProductoResult<Vec<Producto>> {
        self.productos.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> ProductoResult<Option<Producto>> {
        self.productos.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_nombre(&self, nombre: &str) -> ProductoResult<Option<Producto>> {
        self.productos.find_by_nombre(nombre).await
    }

    /// Insert or replace a producto
    #[instrument(skip(self, producto), fields(producto_nombre = %producto.nombre))]
    pub async fn save(&self, producto: Producto) -> ProductoResult<Producto> {
        self.productos.save(producto).await
    }

    #[instrument(skip(self, producto), fields(producto_id = ?producto.id))]
    pub async fn delete(&self, producto: &Producto) -> ProductoResult<()> {
        self.productos.delete(producto).await
    }

    #[instrument(skip(self))]
    pub async fn find_all_categoria(&self) -> ProductoResult<Vec<Categoria>> {
        self.categorias.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_categoria_by_id(&self, id: &str) -> ProductoResult<Option<Categoria>> {
        self.categorias.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_categoria_by_nombre(
        &self,
        nombre: &str,
    ) -> ProductoResult<Option<Categoria>> {
        self.categorias.find_by_nombre(nombre).await
    }

    #[instrument(skip(self, categoria), fields(categoria_nombre = %categoria.nombre))]
    pub async fn save_categoria(&self, categoria: Categoria) -> ProductoResult<Categoria> {
        self.categorias.save(categoria).await
    }

    /// Create each named categoria unless one with that exact name exists.
    ///
    /// Returns only the categorias that were created.
    #[instrument(skip(self, nombres))]
    pub async fn seed_categorias(&self, nombres: &[&str]) -> ProductoResult<Vec<Categoria>> {
        let mut created = Vec::new();
        for nombre in nombres {
            if self.categorias.find_by_nombre(nombre).await?.is_some() {
                debug!(categoria = %nombre, "Categoria already present");
                continue;
            }
            let categoria = self.categorias.save(Categoria::new(*nombre)).await?;
            info!(categoria = %categoria.nombre, id = ?categoria.id, "Categoria seeded");
            created.push(categoria);
        }
        Ok(created)
    }

    /// Every producto with its name upper-cased; nothing is written back
    #[instrument(skip(self))]
    pub async fn find_all_with_name_upper_case(&self) -> ProductoResult<Vec<Producto>> {
        let productos = self.productos.find_all().await?;
        Ok(productos
            .into_iter()
            .map(Producto::with_upper_case_name)
            .collect())
    }

    /// The upper-case listing followed by [`UPPER_CASE_REPEATS`] more passes,
    /// re-querying the repository on each pass.
    pub fn find_all_with_name_upper_case_repeat(
        &self,
    ) -> impl Stream<Item = ProductoResult<Producto>> + '_ {
        self.repeat_upper_case(UPPER_CASE_REPEATS)
    }

    fn repeat_upper_case(
        &self,
        repeats: usize,
    ) -> impl Stream<Item = ProductoResult<Producto>> + '_ {
        stream::iter(0..=repeats)
            .then(move |_| self.find_all_with_name_upper_case())
            .map_ok(|productos| stream::iter(productos.into_iter().map(Ok::<_, ProductoError>)))
            .try_flatten()
    }
}

impl<P: ProductoRepository, C: CategoriaRepository> Clone for ProductoService<P, C> {
    fn clone(&self) -> Self {
        Self {
            productos: Arc::clone(&self.productos),
            categorias: Arc::clone(&self.categorias),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCategoriaRepository, MockProductoRepository};

    fn mesa() -> Producto {
        Producto {
            id: Some("p1".to_string()),
            ..Producto::new("Mesa comedor", 100.0, Categoria::new("Muebles"))
        }
    }

    fn service(
        productos: MockProductoRepository,
        categorias: MockCategoriaRepository,
    ) -> ProductoService<MockProductoRepository, MockCategoriaRepository> {
        ProductoService::new(productos, categorias)
    }

    #[tokio::test]
    async fn test_find_by_id_delegates_to_repository() {
        let mut productos = MockProductoRepository::new();
        productos
            .expect_find_by_id()
            .withf(|id| id == "p1")
            .times(1)
            .returning(|_| Ok(Some(mesa())));

        let service = service(productos, MockCategoriaRepository::new());
        let found = service.find_by_id("p1").await.unwrap();

        assert_eq!(found, Some(mesa()));
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_none() {
        let mut productos = MockProductoRepository::new();
        productos.expect_find_by_id().returning(|_| Ok(None));

        let service = service(productos, MockCategoriaRepository::new());
        assert!(service.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_returns_persisted_producto() {
        let mut productos = MockProductoRepository::new();
        productos.expect_save().times(1).returning(|mut producto| {
            producto.id = Some("generated".to_string());
            Ok(producto)
        });

        let service = service(productos, MockCategoriaRepository::new());
        let saved = service
            .save(Producto::new("Silla", 20.0, Categoria::new("Muebles")))
            .await
            .unwrap();

        assert_eq!(saved.id.as_deref(), Some("generated"));
        assert_eq!(saved.nombre, "Silla");
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut productos = MockProductoRepository::new();
        productos
            .expect_find_all()
            .returning(|| Err(ProductoError::Database("connection reset".to_string())));

        let service = service(productos, MockCategoriaRepository::new());
        let result = service.find_all().await;

        assert!(matches!(result, Err(ProductoError::Database(_))));
    }

    #[tokio::test]
    async fn test_delete_delegates_to_repository() {
        let mut productos = MockProductoRepository::new();
        productos
            .expect_delete()
            .withf(|producto| producto.id.as_deref() == Some("p1"))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(productos, MockCategoriaRepository::new());
        service.delete(&mesa()).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_categoria_by_nombre() {
        let mut categorias = MockCategoriaRepository::new();
        categorias
            .expect_find_by_nombre()
            .withf(|nombre| nombre == "Muebles")
            .returning(|_| {
                Ok(Some(Categoria {
                    id: Some("c1".to_string()),
                    nombre: "Muebles".to_string(),
                }))
            });

        let service = service(MockProductoRepository::new(), categorias);
        let categoria = service.find_categoria_by_nombre("Muebles").await.unwrap();

        assert_eq!(categoria.and_then(|c| c.id).as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_save_categoria_delegates() {
        let mut categorias = MockCategoriaRepository::new();
        categorias.expect_save().times(1).returning(|mut categoria| {
            categoria.id = Some("c9".to_string());
            Ok(categoria)
        });

        let service = service(MockProductoRepository::new(), categorias);
        let saved = service
            .save_categoria(Categoria::new("Deporte"))
            .await
            .unwrap();

        assert_eq!(saved.id.as_deref(), Some("c9"));
    }

    #[tokio::test]
    async fn test_find_all_with_name_upper_case() {
        let mut productos = MockProductoRepository::new();
        productos.expect_find_all().times(1).returning(|| {
            Ok(vec![
                mesa(),
                Producto::new("silla plegable", 10.0, Categoria::new("Muebles")),
            ])
        });

        let service = service(productos, MockCategoriaRepository::new());
        let nombres: Vec<String> = service
            .find_all_with_name_upper_case()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.nombre)
            .collect();

        assert_eq!(nombres, vec!["MESA COMEDOR", "SILLA PLEGABLE"]);
    }

    #[tokio::test]
    async fn test_repeat_replays_listing_and_requeries() {
        let mut productos = MockProductoRepository::new();
        productos
            .expect_find_all()
            .times(3)
            .returning(|| Ok(vec![mesa()]));

        let service = service(productos, MockCategoriaRepository::new());
        let replayed: Vec<Producto> = service.repeat_upper_case(2).try_collect().await.unwrap();

        assert_eq!(replayed.len(), 3);
        assert!(replayed.iter().all(|p| p.nombre == "MESA COMEDOR"));
    }

    #[tokio::test]
    async fn test_repeat_stops_at_first_error() {
        let mut productos = MockProductoRepository::new();
        productos
            .expect_find_all()
            .times(1)
            .returning(|| Err(ProductoError::Database("down".to_string())));

        let service = service(productos, MockCategoriaRepository::new());
        let result: ProductoResult<Vec<Producto>> =
            service.repeat_upper_case(2).try_collect().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_categorias_skips_existing() {
        let mut categorias = MockCategoriaRepository::new();
        categorias.expect_find_by_nombre().returning(|nombre| {
            Ok((nombre == "Deporte").then(|| Categoria {
                id: Some("c1".to_string()),
                nombre: nombre.to_string(),
            }))
        });
        categorias
            .expect_save()
            .times(3)
            .returning(|mut categoria| {
                categoria.id = Some(format!("id-{}", categoria.nombre));
                Ok(categoria)
            });

        let service = service(MockProductoRepository::new(), categorias);
        let created = service.seed_categorias(&DEFAULT_CATEGORIAS).await.unwrap();

        let nombres: Vec<&str> = created.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Electrónico", "Computación", "Muebles"]);
        assert!(created.iter().all(|c| c.id.is_some()));
    }

    #[tokio::test]
    async fn test_seed_categorias_stops_on_error() {
        let mut categorias = MockCategoriaRepository::new();
        categorias
            .expect_find_by_nombre()
            .times(1)
            .returning(|_| Err(ProductoError::Database("down".to_string())));

        let service = service(MockProductoRepository::new(), categorias);
        assert!(service.seed_categorias(&DEFAULT_CATEGORIAS).await.is_err());
    }

    #[test]
    fn test_service_clone_shares_repositories() {
        let service = service(MockProductoRepository::new(), MockCategoriaRepository::new());
        let cloned = service.clone();
        assert!(Arc::ptr_eq(&service.productos, &cloned.productos));
    }
}
