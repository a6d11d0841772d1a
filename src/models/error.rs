use std::collections::HashMap;

use thiserror::Error;

use crate::sql::SqlError;

/// Errors surfaced by model operations
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ModelError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ModelError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ModelError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ModelError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    /// Validation failure for a single field
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), reason.into());
        Self::validation("Invalid field format", field_errors)
    }
}

impl From<SqlError> for ModelError {
    fn from(err: SqlError) -> Self {
        match err {
            SqlError::NoData => ModelError::BadRequest(err.to_string()),
        }
    }
}

/// Name of the violated unique constraint, if `err` is a unique violation
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
