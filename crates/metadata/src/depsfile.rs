//! PKGDEPS writer

use evoke_errors::{Error, Result};
use evoke_types::DependencySet;
use std::path::Path;

/// Write the runtime dependency list, one package name per line.
///
/// The set itself guarantees ordering, uniqueness and exclusion of the
/// building package's own name.
///
/// # Errors
///
/// Returns an I/O error when the file cannot be written.
pub async fn write_pkgdeps(path: &Path, deps: &DependencySet) -> Result<()> {
    let mut text = String::new();
    for name in deps.iter() {
        text.push_str(name);
        text.push('\n');
    }
    tokio::fs::write(path, text)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_one_name_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PKGDEPS");

        let mut deps = DependencySet::new("foo");
        deps.insert("glibc");
        deps.insert("zlib");
        write_pkgdeps(&path, &deps).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text, "glibc\nzlib\n");
    }
}
