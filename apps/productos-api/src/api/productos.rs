use std::sync::Arc;

use axum::Router;
use domain_productos::{
    LocalFileStorage, MongoCategoriaRepository, MongoProductoRepository, ProductoService,
    handlers,
};

pub type MongoProductoService = ProductoService<MongoProductoRepository, MongoCategoriaRepository>;

pub fn service(state: &crate::state::AppState) -> MongoProductoService {
    ProductoService::new(
        MongoProductoRepository::new(&state.db),
        MongoCategoriaRepository::new(&state.db),
    )
}

pub fn router(state: &crate::state::AppState) -> Router {
    let storage = Arc::new(LocalFileStorage::new(state.config.uploads_path.clone()));
    handlers::router(service(state), storage)
}
