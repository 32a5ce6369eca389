use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductoError {
    #[error("Producto not found: {0}")]
    NotFound(String),

    /// Field-level validation failures, already formatted as `El campo <field> <message>`
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid multipart payload: {0}")]
    Multipart(String),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductoResult<T> = Result<T, ProductoError>;

/// Convert ProductoError to AppError for standardized error responses
impl From<ProductoError> for AppError {
    fn from(err: ProductoError) -> Self {
        match err {
            ProductoError::NotFound(id) => AppError::NotFound(format!("Producto {} not found", id)),
            ProductoError::Validation(errors) => AppError::BadRequest(errors.join(", ")),
            ProductoError::Database(msg) => AppError::Database(msg),
            ProductoError::Storage(msg) => AppError::InternalServerError(msg),
            ProductoError::Multipart(msg) => AppError::BadRequest(msg),
            ProductoError::Json(rejection) => AppError::JsonExtractorRejection(rejection),
            ProductoError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Missing productos answer with a bare 404; everything else goes through AppError
impl IntoResponse for ProductoError {
    fn into_response(self) -> Response {
        match self {
            ProductoError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            other => AppError::from(other).into_response(),
        }
    }
}

impl From<mongodb::error::Error> for ProductoError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductoError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ProductoError {
    fn from(err: std::io::Error) -> Self {
        ProductoError::Storage(err.to_string())
    }
}

impl From<MultipartError> for ProductoError {
    fn from(err: MultipartError) -> Self {
        ProductoError::Multipart(err.body_text())
    }
}
