//! Domain error model.

use thiserror::Error;

use crate::document::FieldValue;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures while turning remote documents
/// or user input into domain values. Store and transport failures belong to
/// the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was absent (or explicitly null).
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A field was present with a value of the wrong shape.
    #[error("field `{field}` has wrong type: expected {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A cost string could not be read as a decimal amount.
    #[error("invalid cost `{0}`")]
    InvalidCost(String),

    /// A date lies after the reference instant.
    #[error("date in the future: {0}")]
    FutureDate(String),

    /// A value failed validation (e.g. blank text).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &FieldValue) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn invalid_cost(raw: impl Into<String>) -> Self {
        Self::InvalidCost(raw.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
