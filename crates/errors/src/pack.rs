//! Packaging and post-processing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PackError {
    #[error("package tree is empty; the build produced no installable files")]
    EmptyTree,

    #[error("archive creation failed: {message}")]
    ArchiveFailed { message: String },

    #[error("compression failed: {message}")]
    CompressionFailed { message: String },

    #[error("strip failed for {path}: {message}")]
    StripFailed { path: String, message: String },
}

impl UserFacingError for PackError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyTree => {
                Some("Make sure the build script installs files into the $PKG directory.")
            }
            _ => None,
        }
    }
}
