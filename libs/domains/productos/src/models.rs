use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Message returned alongside a freshly created producto
pub const MENSAJE_CREADO: &str = "Producto Creado con Exito";

/// Categoria entity - a named grouping referenced by productos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Categoria {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Category name
    #[serde(default)]
    pub nombre: String,
}

impl Categoria {
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            id: None,
            nombre: nombre.into(),
        }
    }
}

/// Producto entity - a sellable item stored in MongoDB
///
/// The same shape is used for request bodies and stored documents; `id`,
/// `createAt` and `foto` are usually absent on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Product name
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub nombre: String,
    /// Unit price
    #[validate(
        required(message = "no puede ser nulo"),
        range(min = 0.0, message = "debe ser mayor o igual que 0")
    )]
    pub precio: Option<f64>,
    /// Creation timestamp, assigned on first save when absent
    #[serde(default, deserialize_with = "deserialize_create_at")]
    pub create_at: Option<DateTime<Utc>>,
    /// Stored photo filename (`<uuid>-<sanitized name>`)
    #[serde(default)]
    pub foto: Option<String>,
    /// Embedded category
    #[validate(required(message = "no puede ser nulo"))]
    pub categoria: Option<Categoria>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("no puede estar vacío"));
        return Err(error);
    }
    Ok(())
}

/// Parse an RFC 3339 timestamp or a plain `yyyy-MM-dd` date (midnight UTC)
pub fn parse_create_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// Blank strings count as absent, same as in multipart forms.
fn deserialize_create_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => parse_create_at(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid createAt '{}'", value))),
        _ => Ok(None),
    }
}

impl Producto {
    pub fn new(nombre: impl Into<String>, precio: f64, categoria: Categoria) -> Self {
        Self {
            nombre: nombre.into(),
            precio: Some(precio),
            categoria: Some(categoria),
            ..Default::default()
        }
    }

    /// Stamp the creation time unless one is already present
    pub fn ensure_create_at(&mut self) {
        if self.create_at.is_none() {
            self.create_at = Some(Utc::now());
        }
    }

    /// Copy the editable fields (nombre, precio, categoria) from `changes`
    pub fn apply_update(&mut self, changes: Producto) {
        self.nombre = changes.nombre;
        self.precio = changes.precio;
        self.categoria = changes.categoria;
    }

    /// Project the name to upper case (not persisted)
    pub fn with_upper_case_name(mut self) -> Self {
        self.nombre = self.nombre.to_uppercase();
        self
    }
}

/// Response body for a successful JSON create
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductoCreado {
    pub producto: Producto,
    pub mensaje: String,
    pub timestamp: DateTime<Utc>,
}

/// Response body for a create request that failed validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErroresValidacion {
    /// One `El campo <field> <message>` entry per violation
    pub errors: Vec<String>,
    /// HTTP status code echo
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

/// Multipart form accepted by `POST /v2`
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductoMultipart {
    pub nombre: String,
    pub precio: Option<f64>,
    #[serde(rename = "createAt")]
    pub create_at: Option<DateTime<Utc>>,
    #[serde(rename = "categoria.id")]
    pub categoria_id: Option<String>,
    #[serde(rename = "categoria.nombre")]
    pub categoria_nombre: Option<String>,
    /// Image file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Multipart form accepted by `POST /upload/{id}`
#[derive(Debug, Deserialize, ToSchema)]
pub struct FotoMultipart {
    /// Image file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn muebles() -> Categoria {
        Categoria {
            id: Some("cat-1".to_string()),
            nombre: "Muebles".to_string(),
        }
    }

    #[test]
    fn test_ensure_create_at_sets_missing_timestamp() {
        let mut producto = Producto::new("Mesa comedor", 100.0, muebles());
        let before = Utc::now();
        producto.ensure_create_at();
        let stamped = producto.create_at.expect("timestamp should be set");
        assert!(stamped >= before && stamped <= Utc::now());
    }

    #[test]
    fn test_ensure_create_at_keeps_existing_timestamp() {
        let original = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let mut producto = Producto {
            create_at: Some(original),
            ..Producto::new("Silla", 20.0, muebles())
        };
        producto.ensure_create_at();
        assert_eq!(producto.create_at, Some(original));
    }

    #[test]
    fn test_apply_update_copies_only_editable_fields() {
        let created = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
        let mut stored = Producto {
            id: Some("abc".to_string()),
            create_at: Some(created),
            foto: Some("uuid-foto.png".to_string()),
            ..Producto::new("Mesa", 10.0, muebles())
        };
        let changes = Producto {
            id: Some("other".to_string()),
            foto: Some("ignored.png".to_string()),
            ..Producto::new("Mesa grande", 25.5, Categoria::new("Deporte"))
        };

        stored.apply_update(changes);

        assert_eq!(stored.id.as_deref(), Some("abc"));
        assert_eq!(stored.nombre, "Mesa grande");
        assert_eq!(stored.precio, Some(25.5));
        assert_eq!(stored.categoria.unwrap().nombre, "Deporte");
        assert_eq!(stored.create_at, Some(created));
        assert_eq!(stored.foto.as_deref(), Some("uuid-foto.png"));
    }

    #[test]
    fn test_with_upper_case_name() {
        let producto = Producto::new("Mesa comedor", 100.0, muebles()).with_upper_case_name();
        assert_eq!(producto.nombre, "MESA COMEDOR");
    }

    #[test]
    fn test_producto_json_uses_create_at_camel_case() {
        let producto = Producto {
            id: Some("1".to_string()),
            create_at: Some(Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap()),
            ..Producto::new("Mesa", 1.0, muebles())
        };
        let json = serde_json::to_value(&producto).unwrap();
        assert!(json.get("createAt").is_some());
        assert_eq!(json["categoria"]["nombre"], "Muebles");
    }

    #[test]
    fn test_producto_deserializes_without_optional_fields() {
        let producto: Producto = serde_json::from_str(
            r#"{"nombre":"Mesa comedor","precio":100.0,"categoria":{"nombre":"Muebles"}}"#,
        )
        .unwrap();
        assert!(producto.id.is_none());
        assert!(producto.create_at.is_none());
        assert!(producto.foto.is_none());
        assert_eq!(producto.precio, Some(100.0));
    }

    #[test]
    fn test_producto_deserializes_plain_date_create_at() {
        let producto: Producto = serde_json::from_str(
            r#"{"nombre":"Mesa","precio":1.0,"createAt":"2023-05-01","categoria":{"nombre":"Muebles"}}"#,
        )
        .unwrap();
        assert_eq!(
            producto.create_at,
            Some(Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_producto_create_at_blank_or_null_is_absent() {
        for create_at in [r#""""#, "null"] {
            let producto: Producto = serde_json::from_str(&format!(
                r#"{{"nombre":"Mesa","precio":1.0,"createAt":{}}}"#,
                create_at
            ))
            .unwrap();
            assert!(producto.create_at.is_none());
        }
    }

    #[test]
    fn test_producto_rejects_unparseable_create_at() {
        let result = serde_json::from_str::<Producto>(r#"{"nombre":"Mesa","createAt":"ayer"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_producto_json_round_trips_create_at() {
        let producto = Producto {
            create_at: Some(Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap()),
            ..Producto::new("Mesa", 1.0, muebles())
        };
        let json = serde_json::to_string(&producto).unwrap();
        let back: Producto = serde_json::from_str(&json).unwrap();
        assert_eq!(back.create_at, producto.create_at);
    }
}
