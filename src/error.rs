//! Error types shared by the store backends and the services.

use thiserror::Error;

/// Failures raised by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identifier could not be interpreted as a record id.
    #[error("Cast to id failed for value \"{0}\"")]
    InvalidId(String),

    /// A store-level unique constraint rejected the write.
    #[error("duplicate key value violates unique constraint on {field}: {value}")]
    UniqueViolation { field: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the jewelry type and contact services.
///
/// Every variant maps to exactly one HTTP status in the transport layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(&'static str),

    /// Case-insensitive collision on a unique field.
    #[error("{0}")]
    Duplicate(&'static str),

    /// One message per offending field, in field order.
    #[error("Validation Error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Unexpected(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
