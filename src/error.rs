//! Error types for remote calls and payload sourcing.
//!
//! Errors carry enough context to decide whether a failure stops the run:
//! a [`Error::Configuration`] problem is fatal, while a failed remote call
//! or an unreadable payload file only fails the one operation it belongs to.

use std::io;
use std::path::PathBuf;

/// Result type alias for client and engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving, sourcing, or dispatching operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The run cannot be set up: unresolvable connection values, a malformed
    /// section, or a refused prompt. Always fatal.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A payload file could not be read. Fails the one operation that
    /// declared it.
    #[error("could not read payload file {path}: {source}")]
    PayloadSource {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A remote call failed, with the HTTP status if one was received.
    #[error("remote call failed: {message}")]
    RemoteCall {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a payload sourcing error with path context.
    pub fn payload_source(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PayloadSource {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteCall { status, .. } => *status,
            Self::Configuration(_) | Self::PayloadSource { .. } => None,
        }
    }

    /// Whether this error must stop the run instead of failing one
    /// operation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::RemoteCall {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::RemoteCall {
                message: other.to_string(),
                status: None,
            },
        }
    }
}
