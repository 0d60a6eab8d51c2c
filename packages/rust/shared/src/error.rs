//! Error types for the WonderChat CLI.
//!
//! Library crates use [`WonderchatError`] via `thiserror`.
//! The cli app wraps this with `color-eyre` for rich diagnostics.
//!
//! Remote API failures are not errors here: the request executor reports
//! them as outcomes. This type covers local failures only.

use std::path::PathBuf;

/// Top-level error type for all WonderChat operations.
#[derive(Debug, thiserror::Error)]
pub enum WonderchatError {
    /// Configuration loading, saving, or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTTP client construction or endpoint resolution error.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rejected operator input (malformed URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Reading from or writing to the operator's terminal failed.
    #[error("console error: {0}")]
    Console(#[source] std::io::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WonderchatError>;

impl WonderchatError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a terminal read/write failure.
    pub fn console(source: std::io::Error) -> Self {
        Self::Console(source)
    }
}
