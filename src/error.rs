//! Error types for cfgtable
//!
//! Fatal errors only. Recoverable data problems (duplicate keys, dangling
//! references, ...) are collected in [`crate::report::LoadErrors`] instead.

use thiserror::Error;

/// Result type alias using CfgError
pub type Result<T> = std::result::Result<T, CfgError>;

/// Unified error type for cfgtable operations
#[derive(Debug, Error)]
pub enum CfgError {
    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    /// The buffer ended before the bytes the schema requires
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A decoded value violates an invariant of the layout
    #[error("Malformed field: {0}")]
    MalformedField(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Load Policy Errors
    // -------------------------------------------------------------------------
    /// Raised by the caller's policy when recoverable issues must block startup
    #[error("{0} data errors reported during load")]
    DataErrors(usize),

    #[error("Load failed: {0}")]
    LoadFailed(String),
}

impl CfgError {
    /// True for errors that leave the stream position unusable
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CfgError::TruncatedStream { .. } | CfgError::MalformedField(_)
        )
    }
}
