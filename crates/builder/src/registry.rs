//! Installed-package registry
//!
//! Read-only view over the package manager's installed set: one directory
//! per package, each holding a PKGTREE manifest. Only used for reverse
//! lookup (library file name to owning package); never written.

use evoke_errors::{Error, Result};
use evoke_metadata::{paths, FileTreeManifest};
use std::path::{Path, PathBuf};

/// Database marker entry inside the registry that is not a package
const DB_ENTRY: &str = "DB";

/// An installed package and its file-tree manifest
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub name: String,
    pub manifest: FileTreeManifest,
}

/// Handle on the registry directory
#[derive(Debug, Clone)]
pub struct InstalledRegistry {
    root: PathBuf,
}

impl InstalledRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Registry at the distribution's standard location
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(paths::DEFAULT_REGISTRY)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every installed package's manifest, sorted by package name.
    ///
    /// A missing registry directory is an empty registry. Entries without a
    /// readable PKGTREE are skipped.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the registry directory exists but cannot
    /// be read.
    pub async fn load(&self) -> Result<Vec<InstalledPackage>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.root))?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == DB_ENTRY || !entry.file_type().await?.is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();

        let mut packages = Vec::with_capacity(names.len());
        for name in names {
            let manifest_path = self.root.join(&name).join("PKGTREE");
            match FileTreeManifest::load(&manifest_path).await {
                Ok(manifest) => packages.push(InstalledPackage { name, manifest }),
                Err(e) => {
                    tracing::debug!(package = %name, error = %e, "skipping registry entry without readable PKGTREE");
                }
            }
        }
        Ok(packages)
    }
}
