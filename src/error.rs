//! Error types.
//!
//! The polling core never raises errors to the caller: a failed backend call
//! means "not connected" or "no state change". [`BackendError`] exists so
//! backends can still say *why* a call failed (for logging), and [`Error`]
//! covers the fallible ambient surface (configuration loading).

use thiserror::Error;

/// Failure reported by an [`InputBackend`](crate::backends::InputBackend) call.
///
/// The core only distinguishes success from failure; the variant is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Nothing is plugged into the slot.
    #[error("device not connected")]
    NotConnected,

    /// The backend does not implement this query (e.g. battery info on old runtimes).
    #[error("operation not supported by backend")]
    Unsupported,

    /// Platform call returned a non-success status code.
    #[error("backend call failed with status {0}")]
    Os(u32),
}

/// Crate-level error for configuration and other setup paths.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for padwatch.
pub type Result<T> = std::result::Result<T, Error>;
