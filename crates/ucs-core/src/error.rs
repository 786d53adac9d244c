//! Unified error types for the ucs workspace
//!
//! [`UcsError`] covers every failure that is *not* a solver outcome. An
//! infeasible or time-limited solve is a normal result and lives in the
//! solution's status, not here.
//!
//! # Example
//!
//! ```
//! use ucs_core::{UcsError, UcsResult};
//!
//! fn check_capacity(p_max: f64) -> UcsResult<()> {
//!     if p_max < 0.0 {
//!         return Err(UcsError::validation("generators[coal].p_max", "must be non-negative"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_capacity(-1.0).unwrap_err();
//! assert_eq!(err.field(), Some("generators[coal].p_max"));
//! ```

use thiserror::Error;

/// Unified error type for all ucs operations.
#[derive(Error, Debug)]
pub enum UcsError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited text or unparsable values
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input rejected before model construction
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    /// Solver unavailable or failed for reasons other than infeasibility
    #[error("Solver error: {0}")]
    Solver(String),

    /// Invalid solver or CLI configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using UcsError.
pub type UcsResult<T> = Result<T, UcsError>;

impl UcsError {
    /// Build a validation error naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UcsError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, if this is a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            UcsError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, UcsError::Validation { .. })
    }
}

impl From<anyhow::Error> for UcsError {
    fn from(err: anyhow::Error) -> Self {
        UcsError::Other(err.to_string())
    }
}

impl From<String> for UcsError {
    fn from(s: String) -> Self {
        UcsError::Other(s)
    }
}

impl From<&str> for UcsError {
    fn from(s: &str) -> Self {
        UcsError::Other(s.to_string())
    }
}
