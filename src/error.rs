//! Error types for tablewire
//!
//! Provides a unified error type for every encode, decode and iterate call.

use thiserror::Error;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for tablewire operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Structural Errors
    // -------------------------------------------------------------------------
    /// Declared lengths are inconsistent with the buffer extent
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Unrecognized table-kind tag in a create-table request
    #[error("Invalid table kind: {0}")]
    InvalidTableKind(u8),

    /// Buffer ended before an expected field completed
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WireError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        WireError::MalformedMessage(msg.into())
    }
}

impl From<std::collections::TryReserveError> for WireError {
    fn from(e: std::collections::TryReserveError) -> Self {
        WireError::AllocationFailure(e.to_string())
    }
}
