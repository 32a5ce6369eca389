//! HTTP handlers for the Productos API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::errors::responses::{BadRequestResponse, InternalServerErrorResponse};
use chrono::Utc;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductoError, ProductoResult};
use crate::models::{
    Categoria, ErroresValidacion, FotoMultipart, MENSAJE_CREADO, Producto, ProductoCreado,
    ProductoMultipart,
};
use crate::repository::{CategoriaRepository, ProductoRepository};
use crate::service::ProductoService;
use crate::storage::{FileStorage, photo_filename};
use crate::upload::{read_file_part, read_producto_form};
use crate::validation::validate_producto;

/// Mount point of the router; used to build `Location` headers
pub const BASE_PATH: &str = "/api/v1/productos";

/// Largest request body accepted, photos included
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// OpenAPI documentation for Productos API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_productos,
        get_producto,
        create_producto,
        create_producto_con_foto,
        upload_foto,
        update_producto,
        delete_producto,
    ),
    components(
        schemas(
            Producto, Categoria, ProductoCreado, ErroresValidacion,
            ProductoMultipart, FotoMultipart
        ),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Productos", description = "Producto catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Shared handler state: the service plus where photos go
pub struct ProductosState<P: ProductoRepository, C: CategoriaRepository> {
    pub service: ProductoService<P, C>,
    pub storage: Arc<dyn FileStorage>,
}

type SharedState<P, C> = State<Arc<ProductosState<P, C>>>;

/// Create the productos router with all HTTP endpoints
pub fn router<P, C>(service: ProductoService<P, C>, storage: Arc<dyn FileStorage>) -> Router
where
    P: ProductoRepository + 'static,
    C: CategoriaRepository + 'static,
{
    let shared_state = Arc::new(ProductosState { service, storage });

    Router::new()
        .route("/", get(list_productos).post(create_producto))
        .route("/v2", post(create_producto_con_foto))
        .route("/upload/{id}", post(upload_foto))
        .route(
            "/{id}",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(shared_state)
}

fn location(producto: &Producto) -> ProductoResult<String> {
    producto
        .id
        .as_deref()
        .map(|id| format!("{}/{}", BASE_PATH, id))
        .ok_or_else(|| ProductoError::Internal("saved producto has no id".to_string()))
}

impl<P: ProductoRepository, C: CategoriaRepository> ProductosState<P, C> {
    /// Fetch a producto or fail with NotFound (bare 404)
    async fn load(&self, id: &str) -> ProductoResult<Producto> {
        self.service
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductoError::NotFound(id.to_string()))
    }
}

/// List every producto
#[utoipa::path(
    get,
    path = "",
    tag = "Productos",
    responses(
        (status = 200, description = "List of productos", body = Vec<Producto>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_productos<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
) -> ProductoResult<Json<Vec<Producto>>> {
    let productos = state.service.find_all().await?;
    Ok(Json(productos))
}

/// Get a producto by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Producto ID")
    ),
    responses(
        (status = 200, description = "Producto found", body = Producto),
        (status = 404, description = "Producto not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_producto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    Path(id): Path<String>,
) -> ProductoResult<Json<Producto>> {
    let producto = state.load(&id).await?;
    Ok(Json(producto))
}

/// Create a producto from JSON
///
/// Validation failures are answered with the itemized `errors` list rather
/// than the shared error body.
#[utoipa::path(
    post,
    path = "",
    tag = "Productos",
    request_body = Producto,
    responses(
        (status = 201, description = "Producto created", body = ProductoCreado,
            headers(("Location" = String, description = "URI of the new producto"))),
        (status = 400, description = "Validation failed", body = ErroresValidacion),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_producto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    payload: Result<Json<Producto>, JsonRejection>,
) -> ProductoResult<Response> {
    let Json(mut producto) = payload?;

    match validate_producto(&producto) {
        Ok(()) => {}
        Err(ProductoError::Validation(errors)) => {
            let body = ErroresValidacion {
                errors,
                status: StatusCode::BAD_REQUEST.as_u16(),
                timestamp: Utc::now(),
            };
            return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
        }
        Err(other) => return Err(other),
    }

    producto.ensure_create_at();
    let producto = state.service.save(producto).await?;
    let location = location(&producto)?;

    let body = ProductoCreado {
        producto,
        mensaje: MENSAJE_CREADO.to_string(),
        timestamp: Utc::now(),
    };
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

/// Create a producto together with its photo
#[utoipa::path(
    post,
    path = "/v2",
    tag = "Productos",
    request_body(content = ProductoMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Producto created with photo", body = Producto,
            headers(("Location" = String, description = "URI of the new producto"))),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_producto_con_foto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    multipart: Multipart,
) -> ProductoResult<Response> {
    let form = read_producto_form(multipart).await?;
    let mut producto = form.producto;

    producto.ensure_create_at();
    let foto = photo_filename(&form.file.filename);
    state.storage.store(&foto, &form.file.bytes).await?;
    producto.foto = Some(foto);

    let producto = state.service.save(producto).await?;
    let location = location(&producto)?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(producto)).into_response())
}

/// Attach a photo to an existing producto
#[utoipa::path(
    post,
    path = "/upload/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Producto ID")
    ),
    request_body(content = FotoMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored", body = Producto),
        (status = 400, response = BadRequestResponse),
        (status = 404, description = "Producto not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_foto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ProductoResult<Json<Producto>> {
    let mut producto = state.load(&id).await?;
    let file = read_file_part(multipart).await?;

    let foto = photo_filename(&file.filename);
    state.storage.store(&foto, &file.bytes).await?;
    producto.foto = Some(foto);

    let producto = state.service.save(producto).await?;
    Ok(Json(producto))
}

/// Replace the name, price and category of a producto
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Producto ID")
    ),
    request_body = Producto,
    responses(
        (status = 201, description = "Producto updated", body = Producto,
            headers(("Location" = String, description = "URI of the producto"))),
        (status = 404, description = "Producto not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_producto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    Path(id): Path<String>,
    payload: Result<Json<Producto>, JsonRejection>,
) -> ProductoResult<Response> {
    let Json(changes) = payload?;
    let mut producto = state.load(&id).await?;

    producto.apply_update(changes);
    let producto = state.service.save(producto).await?;
    let location = location(&producto)?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(producto)).into_response())
}

/// Delete a producto
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Producto ID")
    ),
    responses(
        (status = 204, description = "Producto deleted"),
        (status = 404, description = "Producto not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_producto<P: ProductoRepository, C: CategoriaRepository>(
    State(state): SharedState<P, C>,
    Path(id): Path<String>,
) -> ProductoResult<StatusCode> {
    let producto = state.load(&id).await?;
    state.service.delete(&producto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_uses_base_path() {
        let producto = Producto {
            id: Some("abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(location(&producto).unwrap(), "/api/v1/productos/abc123");
    }

    #[test]
    fn test_location_without_id_is_internal_error() {
        let result = location(&Producto::default());
        assert!(matches!(result, Err(ProductoError::Internal(_))));
    }

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v2"));
        assert!(paths.iter().any(|p| p.as_str() == "/upload/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/{id}"));
    }
}
