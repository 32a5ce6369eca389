//! Translation of `validator` failures into the itemized field-error list
//! returned by the create endpoint.

use validator::{Validate, ValidationErrors};

use crate::error::{ProductoError, ProductoResult};
use crate::models::Producto;

/// Validate a producto, returning every violation as `El campo <field> <message>`
pub fn validate_producto(producto: &Producto) -> ProductoResult<()> {
    producto
        .validate()
        .map_err(|errors| ProductoError::Validation(field_errors(&errors)))
}

/// Flatten validation errors into an ordered list of messages.
///
/// Fields are sorted by name; violations within one field keep their
/// declaration order. Errors without a message fall back to their code.
pub fn field_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| {
                let message = violation
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| violation.code.to_string());
                format!("El campo {} {}", field, message)
            })
        })
        .collect()
}
