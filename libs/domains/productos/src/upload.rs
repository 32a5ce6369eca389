//! Multipart form decoding for the photo endpoints

use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::{DateTime, Utc};

use crate::error::{ProductoError, ProductoResult};
use crate::models::{self, Categoria, Producto};

/// Name of the multipart part carrying the image
pub const FILE_FIELD: &str = "file";

/// An uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client, before sanitizing
    pub filename: String,
    pub bytes: Bytes,
}

/// Decoded `POST /v2` form: producto fields plus the photo
#[derive(Debug)]
pub struct ProductoForm {
    pub producto: Producto,
    pub file: UploadedFile,
}

/// Read a producto and its photo from a multipart body.
///
/// Recognized text parts: `nombre`, `precio`, `createAt`, `categoria.id`,
/// `categoria.nombre`. Unknown parts are skipped. The `file` part is required.
pub async fn read_producto_form(mut multipart: Multipart) -> ProductoResult<ProductoForm> {
    let mut producto = Producto::default();
    let mut categoria_id = None;
    let mut categoria_nombre = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILE_FIELD => file = Some(read_file(field).await?),
            "nombre" => producto.nombre = field.text().await?,
            "precio" => producto.precio = parse_precio(&field.text().await?)?,
            "createAt" => producto.create_at = parse_create_at(&field.text().await?)?,
            "categoria.id" => categoria_id = non_empty(field.text().await?),
            "categoria.nombre" => categoria_nombre = non_empty(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    if categoria_id.is_some() || categoria_nombre.is_some() {
        producto.categoria = Some(Categoria {
            id: categoria_id,
            nombre: categoria_nombre.unwrap_or_default(),
        });
    }

    let file = file.ok_or_else(missing_file)?;
    Ok(ProductoForm { producto, file })
}

/// Read the `file` part from a multipart body, ignoring anything else
pub async fn read_file_part(mut multipart: Multipart) -> ProductoResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return read_file(field).await;
        }
    }
    Err(missing_file())
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> ProductoResult<UploadedFile> {
    let filename = field.file_name().unwrap_or(FILE_FIELD).to_string();
    let bytes = field.bytes().await?;
    Ok(UploadedFile { filename, bytes })
}

fn missing_file() -> ProductoError {
    ProductoError::Multipart(format!("missing part '{}'", FILE_FIELD))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// Blank means absent, like the other optional form fields.
fn parse_precio(value: &str) -> ProductoResult<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ProductoError::Multipart(format!("invalid precio '{}'", value)))
}

fn parse_create_at(value: &str) -> ProductoResult<Option<DateTime<Utc>>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    models::parse_create_at(value)
        .map(Some)
        .ok_or_else(|| ProductoError::Multipart(format!("invalid createAt '{}'", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_precio() {
        assert_eq!(parse_precio(" 100.50 ").unwrap(), Some(100.5));
        assert!(matches!(parse_precio("cien"), Err(ProductoError::Multipart(_))));
    }

    #[test]
    fn test_parse_precio_blank_is_none() {
        assert_eq!(parse_precio("").unwrap(), None);
        assert_eq!(parse_precio("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_create_at_rfc3339() {
        let parsed = parse_create_at("2023-05-01T10:30:00Z").unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2023, 5, 1, 10, 30, 0).unwrap()));
    }

    #[test]
    fn test_parse_create_at_plain_date() {
        let parsed = parse_create_at("2023-05-01").unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_create_at_blank_is_none() {
        assert_eq!(parse_create_at("  ").unwrap(), None);
    }

    #[test]
    fn test_parse_create_at_rejects_garbage() {
        assert!(parse_create_at("ayer").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(" Muebles ".to_string()).as_deref(), Some("Muebles"));
        assert_eq!(non_empty("   ".to_string()), None);
    }
}
