//! Error types for memrepo
//!
//! All errors are caller configuration errors detected at query time and
//! reported synchronously. Nothing is retried internally.

use thiserror::Error;

/// Result alias used across memrepo crates
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by the filter engine and the repository
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// A filter, sort or assignment names a field the entity type does not register
    #[error("field not found: {field}")]
    FieldNotFound {
        /// The unknown field name
        field: String,
    },

    /// A field has no setter registered, so it cannot be assigned
    #[error("field is read-only: {field}")]
    ReadOnlyField {
        /// The field name
        field: String,
    },

    /// Ordering or conversion applied to values of incompatible runtime types
    #[error("type mismatch on field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field being compared or assigned
        field: String,
        /// Type required by the operand or setter
        expected: String,
        /// Runtime type of the field value
        actual: String,
    },

    /// Unrecognized comparison operator name
    #[error("unsupported operator: {operator}")]
    UnsupportedOperator {
        /// The operator name as supplied
        operator: String,
    },

    /// Operand shape does not fit the operator (e.g. `In` without a list)
    #[error("invalid operand for {check} on field '{field}': {reason}")]
    InvalidOperand {
        /// The field the filter targets
        field: String,
        /// The operator name
        check: String,
        /// What was wrong
        reason: String,
    },

    /// An operation that requires a match found none
    #[error("not found: {reason}")]
    NotFound {
        /// Description of what was looked for
        reason: String,
    },
}

impl RepoError {
    /// Build a `FieldNotFound` error
    pub fn field_not_found(field: impl Into<String>) -> Self {
        RepoError::FieldNotFound {
            field: field.into(),
        }
    }

    /// Build a `TypeMismatch` error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        RepoError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build an `UnsupportedOperator` error
    pub fn unsupported_operator(operator: impl Into<String>) -> Self {
        RepoError::UnsupportedOperator {
            operator: operator.into(),
        }
    }

    /// Build an `InvalidOperand` error
    pub fn invalid_operand(
        field: impl Into<String>,
        check: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RepoError::InvalidOperand {
            field: field.into(),
            check: check.into(),
            reason: reason.into(),
        }
    }

    /// Build a `NotFound` error
    pub fn not_found(reason: impl Into<String>) -> Self {
        RepoError::NotFound {
            reason: reason.into(),
        }
    }
}
