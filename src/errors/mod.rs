mod error;

pub use error::{DbError, DomainError, ServiceError, ValidationError};

/// Result type for domain-level operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for service-level operations
pub type ServiceResult<T> = Result<T, ServiceError>;
