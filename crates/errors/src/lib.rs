#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the evoke build pipeline
//!
//! This crate provides fine-grained error types organized by domain,
//! plus a generic [`Error`] for cross-crate boundaries.

use std::borrow::Cow;

use thiserror::Error;

pub mod build;
pub mod metadata;
pub mod network;
pub mod pack;

// Re-export all error types at the root
pub use build::BuildError;
pub use metadata::MetadataError;
pub use network::NetworkError;
pub use pack::PackError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Error)]
pub enum Error {
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("packaging error: {0}")]
    Pack(#[from] PackError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Result type alias for evoke operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Metadata(err) => err.user_message(),
            Error::Network(err) => err.user_message(),
            Error::Build(err) => err.user_message(),
            Error::Pack(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Metadata(err) => err.user_hint(),
            Error::Network(err) => err.user_hint(),
            Error::Build(err) => err.user_hint(),
            Error::Pack(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }
}
