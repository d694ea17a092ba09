//! Package metadata (PKGINFO) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("cannot read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("malformed line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("pkgrel is not a number: {value}")]
    InvalidRelease { value: String },
}

impl UserFacingError for MetadataError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { .. } | Self::MalformedLine { .. } => {
                Some("Fix the metadata/PKGINFO file; each line must be `field = value`.")
            }
            Self::InvalidRelease { .. } => {
                Some("The pkgrel field must hold a positive integer, e.g. `pkgrel = 1`.")
            }
            Self::ReadFailed { .. } => {
                Some("Run evoke from the package root, next to the metadata directory.")
            }
        }
    }
}
