//! Per-build path context

use evoke_errors::{BuildError, Result};
use evoke_metadata::paths;
use evoke_types::PackageId;
use std::path::{Path, PathBuf};

/// Paths of one build invocation, all absolute.
///
/// The `build/` tree is ephemeral; everything else outlives the build.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub id: PackageId,
    /// Package root (the directory holding `metadata/`, `scripts/`, `data/`)
    pub package_root: PathBuf,
    /// Ephemeral build directory, sources are downloaded here
    pub build_dir: PathBuf,
    /// Working directory the build script runs in
    pub work_dir: PathBuf,
    /// Directory the build script installs into
    pub data_dir: PathBuf,
}

impl BuildContext {
    /// Create a context rooted at an existing package directory.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::PrepareFailed` when the package root cannot be
    /// resolved to an absolute path.
    pub fn new(package_root: &Path, id: PackageId) -> Result<Self> {
        let package_root =
            package_root
                .canonicalize()
                .map_err(|e| BuildError::PrepareFailed {
                    message: format!("cannot resolve {}: {e}", package_root.display()),
                })?;
        let build_dir = package_root.join(paths::BUILD_DIR);
        let work_dir = package_root.join(paths::WORK_DIR);
        let data_dir = package_root.join(paths::DATA_DIR);
        Ok(Self {
            id,
            package_root,
            build_dir,
            work_dir,
            data_dir,
        })
    }

    /// Absolute path of the build script
    #[must_use]
    pub fn script_path(&self) -> PathBuf {
        self.package_root.join(paths::BUILD_SCRIPT)
    }
}
