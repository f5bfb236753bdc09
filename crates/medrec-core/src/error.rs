//! Validation error types shared across the workspace.
//!
//! Validation failures are always local: they are raised before any
//! external system is contacted and are never retried.

use thiserror::Error;

/// Caller input failed validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// The uploaded payload is empty or unreadable.
    #[error("payload is empty or not byte-readable")]
    EmptyPayload,

    /// No patient identity was supplied and no fallback identity is
    /// configured.
    #[error("patient id is required and no fallback identity is configured")]
    MissingPatientId,
}
