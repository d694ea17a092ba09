//! Build sandbox error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("failed to prepare build directory: {message}")]
    PrepareFailed { message: String },

    #[error("missing build script: {path}")]
    MissingScript { path: String },

    #[error("failed to spawn build script {script}: {message}")]
    SpawnFailed { script: String, message: String },

    #[error("build script exited with status {code}")]
    ScriptFailed { code: i32 },

    #[error("build script terminated by signal")]
    ScriptKilled,
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingScript { .. } => {
                Some("The package needs a shell build script at scripts/PKGBUILD.")
            }
            Self::ScriptFailed { .. } | Self::ScriptKilled => {
                Some("Inspect build.stdout.log and build.stderr.log in the package root.")
            }
            _ => None,
        }
    }
}
