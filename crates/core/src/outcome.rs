//! Outcome of backend initialization and operations.
use crate::codes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of initializing a backend.
///
/// Every caller waiting on the same identity receives a clone
/// of the same outcome.
pub type InitOutcome = std::result::Result<(), BackendError>;

/// Error reported by a backend through a completion.
///
/// Carries a numeric code and a human readable message which
/// hosts display to the user.
#[derive(Debug, Clone, Error, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct BackendError {
    code: i32,
    message: String,
}

impl BackendError {
    /// Create a backend error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Numeric error code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error delivered to pending callers when the registry
    /// is torn down.
    pub fn shutdown() -> Self {
        Self::new(
            codes::REGISTRY_SHUTDOWN,
            "backend registry was shut down",
        )
    }

    /// Error for operations attempted before initialization.
    pub fn not_initialized() -> Self {
        Self::new(codes::NOT_INITIALIZED, "backend is not initialized")
    }
}
