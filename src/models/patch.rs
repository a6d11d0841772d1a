use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::ModelError;
use crate::sql::{Column, SqlValue};

/// An updatable field that can be read from a JSON PATCH body
pub trait PatchField: Column + Sized {
    /// Map a wire key (e.g. `numEmployees`) to the field
    fn from_key(key: &str) -> Option<Self>;

    /// Type-check and convert the supplied value for this field
    fn parse_value(self, value: &Value) -> Result<SqlValue, String>;
}

/// Convert a PATCH body into an ordered field list, preserving key order.
///
/// Keys listed in `ignored` are dropped without error. Unknown keys and
/// ill-typed values are collected into a single validation error.
pub fn parse_patch<F: PatchField>(
    payload: &Map<String, Value>,
    ignored: &[&str],
) -> Result<Vec<(F, SqlValue)>, ModelError> {
    let mut fields = Vec::with_capacity(payload.len());
    let mut field_errors = HashMap::new();

    for (key, value) in payload {
        if ignored.contains(&key.as_str()) {
            tracing::debug!("Ignoring immutable field '{}' in update", key);
            continue;
        }
        match F::from_key(key) {
            Some(field) => match field.parse_value(value) {
                Ok(v) => fields.push((field, v)),
                Err(reason) => {
                    field_errors.insert(key.clone(), reason);
                }
            },
            None => {
                field_errors.insert(key.clone(), "is not an updatable field".to_string());
            }
        }
    }

    if !field_errors.is_empty() {
        return Err(ModelError::validation("Invalid update data", field_errors));
    }
    Ok(fields)
}
