//! # Error Types
//!
//! Domain-specific error types for pixmart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pixmart-core errors (this file)                                       │
//! │  └── ValidationError  - Document shape / required-field failures       │
//! │                                                                         │
//! │  pixmart-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures (wraps ValidationError)       │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → caller                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in the message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at create time and again when an edited document is re-validated
/// before it is saved. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. an identifier containing whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Raw input could not be read into the typed document shape.
    ///
    /// ## When This Occurs
    /// - A required key is missing from JSON input
    /// - A value has the wrong type
    /// - A patch carries an unknown key (including `id`)
    /// - An enum value is outside its declared set
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },
}

impl ValidationError {
    /// Creates a Required error for the given field path.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::InvalidDocument {
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
