//! MongoDB implementations of ProductoRepository and CategoriaRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ProductoResult;
use crate::models::{Categoria, Producto};
use crate::repository::{CategoriaRepository, ProductoRepository};

pub const PRODUCTOS_COLLECTION: &str = "productos";
pub const CATEGORIAS_COLLECTION: &str = "categorias";

/// Stored shape of a producto; the id lives in `_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductoDocument {
    #[serde(rename = "_id")]
    id: String,
    nombre: String,
    precio: Option<f64>,
    #[serde(rename = "createAt")]
    create_at: Option<DateTime<Utc>>,
    foto: Option<String>,
    categoria: Option<Categoria>,
}

impl ProductoDocument {
    fn new(producto: Producto, id: String) -> Self {
        Self {
            id,
            nombre: producto.nombre,
            precio: producto.precio,
            create_at: producto.create_at,
            foto: producto.foto,
            categoria: producto.categoria,
        }
    }
}

impl From<ProductoDocument> for Producto {
    fn from(document: ProductoDocument) -> Self {
        Self {
            id: Some(document.id),
            nombre: document.nombre,
            precio: document.precio,
            create_at: document.create_at,
            foto: document.foto,
            categoria: document.categoria,
        }
    }
}

/// Stored shape of a categoria
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoriaDocument {
    #[serde(rename = "_id")]
    id: String,
    nombre: String,
}

impl From<CategoriaDocument> for Categoria {
    fn from(document: CategoriaDocument) -> Self {
        Self {
            id: Some(document.id),
            nombre: document.nombre,
        }
    }
}

/// Use the caller's id, or mint a fresh ObjectId the way the store would
fn assign_id(id: Option<String>) -> String {
    id.unwrap_or_else(|| ObjectId::new().to_hex())
}

fn nombre_index(name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "nombre": 1 })
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

/// MongoDB implementation of the ProductoRepository
pub struct MongoProductoRepository {
    collection: Collection<ProductoDocument>,
}

impl MongoProductoRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTOS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductoDocument>(collection_name);
        Self { collection }
    }

    /// Create the name lookup index
    pub async fn init_indexes(&self) -> ProductoResult<()> {
        self.collection
            .create_index(nombre_index("idx_producto_nombre"))
            .await?;
        tracing::info!("Producto indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductoRepository for MongoProductoRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ProductoResult<Vec<Producto>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ProductoDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Producto::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductoResult<Option<Producto>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Producto::from))
    }

    #[instrument(skip(self))]
    async fn find_by_nombre(&self, nombre: &str) -> ProductoResult<Option<Producto>> {
        let document = self.collection.find_one(doc! { "nombre": nombre }).await?;
        Ok(document.map(Producto::from))
    }

    #[instrument(skip(self, producto), fields(producto_nombre = %producto.nombre))]
    async fn save(&self, producto: Producto) -> ProductoResult<Producto> {
        let id = assign_id(producto.id.clone());
        let document = ProductoDocument::new(producto, id);

        self.collection
            .replace_one(doc! { "_id": document.id.as_str() }, &document)
            .upsert(true)
            .await?;

        tracing::info!(producto_id = %document.id, "Producto saved");
        Ok(document.into())
    }

    #[instrument(skip(self, producto), fields(producto_id = ?producto.id))]
    async fn delete(&self, producto: &Producto) -> ProductoResult<()> {
        if let Some(id) = producto.id.as_deref() {
            let result = self.collection.delete_one(doc! { "_id": id }).await?;
            tracing::info!(producto_id = %id, deleted = result.deleted_count, "Producto deleted");
        }
        Ok(())
    }
}

/// MongoDB implementation of the CategoriaRepository
pub struct MongoCategoriaRepository {
    collection: Collection<CategoriaDocument>,
}

impl MongoCategoriaRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, CATEGORIAS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<CategoriaDocument>(collection_name);
        Self { collection }
    }

    pub async fn init_indexes(&self) -> ProductoResult<()> {
        self.collection
            .create_index(nombre_index("idx_categoria_nombre"))
            .await?;
        tracing::info!("Categoria indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl CategoriaRepository for MongoCategoriaRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ProductoResult<Vec<Categoria>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<CategoriaDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Categoria::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductoResult<Option<Categoria>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Categoria::from))
    }

    #[instrument(skip(self))]
    async fn find_by_nombre(&self, nombre: &str) -> ProductoResult<Option<Categoria>> {
        let document = self.collection.find_one(doc! { "nombre": nombre }).await?;
        Ok(document.map(Categoria::from))
    }

    #[instrument(skip(self, categoria), fields(categoria_nombre = %categoria.nombre))]
    async fn save(&self, categoria: Categoria) -> ProductoResult<Categoria> {
        let document = CategoriaDocument {
            id: assign_id(categoria.id),
            nombre: categoria.nombre,
        };

        self.collection
            .replace_one(doc! { "_id": document.id.as_str() }, &document)
            .upsert(true)
            .await?;

        tracing::info!(categoria_id = %document.id, "Categoria saved");
        Ok(document.into())
    }

    #[instrument(skip(self, categoria), fields(categoria_id = ?categoria.id))]
    async fn delete(&self, categoria: &Categoria) -> ProductoResult<()> {
        if let Some(id) = categoria.id.as_deref() {
            self.collection.delete_one(doc! { "_id": id }).await?;
        }
        Ok(())
    }
}
