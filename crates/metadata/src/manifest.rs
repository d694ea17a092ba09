//! File-tree manifest (PKGTREE)
//!
//! A flat listing of every path under the package's data root, captured once
//! the build script has finished. The same format is read back from the
//! installed-package registry to answer "which package owns this library".

use evoke_errors::{Error, PackError, Result};
use std::path::Path;

/// Ordered listing of every path under a package's data root.
///
/// The first entry is always the root marker `.`; the rest are `./`-prefixed
/// relative paths in pre-order depth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeManifest {
    entries: Vec<String>,
}

impl FileTreeManifest {
    /// Capture the tree under `root`.
    ///
    /// Directory entries are sorted by name so the manifest is stable across
    /// filesystems.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a directory cannot be read.
    pub fn snapshot(root: &Path) -> Result<Self> {
        let mut entries = vec![".".to_string()];
        walk(root, ".", &mut entries)?;
        Ok(Self { entries })
    }

    /// Parse manifest text, one path per line
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            entries: text
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Load a manifest file from disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be read.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        Ok(Self::parse(&text))
    }

    /// Write the manifest to disk, one path per line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be written.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let mut text = self.entries.join("\n");
        text.push('\n');
        tokio::fs::write(path, text)
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }

    /// Reject manifests that list nothing beyond the root marker.
    ///
    /// # Errors
    ///
    /// Returns `PackError::EmptyTree` when the build produced no content.
    pub fn validate(&self) -> Result<()> {
        if self.entries.len() <= 1 {
            return Err(PackError::EmptyTree.into());
        }
        Ok(())
    }

    /// Whether any entry's final path segment equals `file_name` exactly
    #[must_use]
    pub fn owns(&self, file_name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.rsplit('/').next() == Some(file_name))
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn walk(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    let mut children: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| Error::io_with_path(&e, dir))?
        .collect::<std::io::Result<_>>()?;
    children.sort_by_key(std::fs::DirEntry::file_name);

    for child in children {
        let name = child.file_name();
        let entry = format!("{prefix}/{}", name.to_string_lossy());
        out.push(entry.clone());
        // file_type() does not follow symlinks, so symlinked directories are
        // listed but not descended into, matching find(1)
        if child.file_type()?.is_dir() {
            walk(&child.path(), &entry, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_depth_first_with_root_marker() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("usr/bin")).unwrap();
        std::fs::write(dir.path().join("usr/bin/tool"), b"x").unwrap();
        std::fs::write(dir.path().join("README"), b"x").unwrap();

        let manifest = FileTreeManifest::snapshot(dir.path()).unwrap();
        assert_eq!(
            manifest.entries(),
            &[".", "./README", "./usr", "./usr/bin", "./usr/bin/tool"]
        );
    }

    #[test]
    fn test_validate_rejects_root_only() {
        let manifest = FileTreeManifest::parse(".\n");
        let err = manifest.validate().unwrap_err();
        assert!(matches!(err, Error::Pack(PackError::EmptyTree)));

        let manifest = FileTreeManifest::parse(".\n./usr\n");
        manifest.validate().unwrap();
    }

    #[test]
    fn test_owns_matches_final_segment_only() {
        let manifest = FileTreeManifest::parse(".\n./usr/lib/libfoo.so.1\n");
        assert!(manifest.owns("libfoo.so.1"));
        assert!(!manifest.owns("libfoo.so"));
        assert!(!manifest.owns("lib"));
    }

    #[tokio::test]
    async fn test_write_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PKGTREE");
        let manifest = FileTreeManifest::parse(".\n./usr\n./usr/bin\n");
        manifest.write(&path).await.unwrap();
        let loaded = FileTreeManifest::load(&path).await.unwrap();
        assert_eq!(loaded, manifest);
    }
}
