use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Database errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Connection pool error: {0}")]
    ConnectionPool(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Record not found: {0} with ID {1}")]
    NotFound(String, String),

    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl serde::Serialize for DbError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DbError", 2)?;
        let (kind, message) = match self {
            DbError::Sqlx(err) => ("Sqlx", err.to_string()),
            DbError::ConnectionPool(s) => ("ConnectionPool", s.clone()),
            DbError::Transaction(s) => ("Transaction", s.clone()),
            DbError::Query(s) => ("Query", s.clone()),
            DbError::NotFound(entity, id) => {
                ("NotFound", format!("Record not found: {} with ID {}", entity, id))
            }
            DbError::Conflict(s) => ("Conflict", s.clone()),
            DbError::Migration(s) => ("Migration", s.clone()),
            DbError::Other(s) => ("Other", s.clone()),
        };
        state.serialize_field("type", kind)?;
        state.serialize_field("message", &message)?;
        state.end()
    }
}

/// Manual Clone implementation for DbError (sqlx::Error is not Clone)
impl Clone for DbError {
    fn clone(&self) -> Self {
        match self {
            DbError::Sqlx(err) => DbError::Other(format!("SQLx error: {}", err)),
            DbError::ConnectionPool(s) => DbError::ConnectionPool(s.clone()),
            DbError::Transaction(s) => DbError::Transaction(s.clone()),
            DbError::Query(s) => DbError::Query(s.clone()),
            DbError::NotFound(s1, s2) => DbError::NotFound(s1.clone(), s2.clone()),
            DbError::Conflict(s) => DbError::Conflict(s.clone()),
            DbError::Migration(s) => DbError::Migration(s.clone()),
            DbError::Other(s) => DbError::Other(s.clone()),
        }
    }
}

/// Domain-level errors
#[derive(Debug, Error, Clone, Serialize)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Entity not found: {0} with ID {1}")]
    EntityNotFound(String, Uuid),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Service-level errors (application specific)
#[derive(Debug, Error, Clone, Serialize)]
pub enum ServiceError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors with field-level context
#[derive(Debug, Error, Clone, Serialize)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' must be at least {min} characters")]
    MinLength { field: String, min: usize },

    #[error("Field '{field}' cannot exceed {max} characters")]
    MaxLength { field: String, max: usize },

    #[error("Field '{field}' contains invalid format: {reason}")]
    Format { field: String, reason: String },

    #[error("Field '{field}' must be unique")]
    Unique { field: String },

    #[error("Field '{field}' contains an invalid value: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        Self::Required { field: field.to_string() }
    }

    pub fn min_length(field: &str, min: usize) -> Self {
        Self::MinLength { field: field.to_string(), min }
    }

    pub fn max_length(field: &str, max: usize) -> Self {
        Self::MaxLength { field: field.to_string(), max }
    }

    pub fn format(field: &str, reason: &str) -> Self {
        Self::Format {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unique(field: &str) -> Self {
        Self::Unique { field: field.to_string() }
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The field the error is attached to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MinLength { field, .. }
            | ValidationError::MaxLength { field, .. }
            | ValidationError::Format { field, .. }
            | ValidationError::Unique { field }
            | ValidationError::InvalidValue { field, .. } => field,
        }
    }
}
