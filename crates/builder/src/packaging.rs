//! Archive creation
//!
//! Tars the whole package directory (preserving permissions and symlinks),
//! compresses it with xz and renames the result to the distribution's
//! `.evx` suffix. The rename happens only after the encoder has finished,
//! so a crash never leaves a half-written package behind.

use evoke_errors::{Error, PackError, Result};
use evoke_metadata::paths;
use evoke_types::PackageId;
use std::path::{Path, PathBuf};

/// Archive the package directory into `<name>-<version>.evx` next to it.
///
/// # Errors
///
/// Returns `PackError` when tar creation or compression fails and I/O
/// errors for the surrounding file operations.
pub async fn archive_package(package_root: &Path, id: &PackageId) -> Result<PathBuf> {
    let parent = match package_root.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir_name = package_root
        .file_name()
        .ok_or_else(|| Error::internal("package directory has no name"))?
        .to_os_string();

    let tar_path = parent.join(format!("{id}.tar"));
    let xz_path = parent.join(format!("{id}.tar.xz"));
    let package_path = parent.join(format!("{id}.{}", paths::PACKAGE_EXT));

    create_tar(&tar_path, package_root, Path::new(&dir_name)).await?;
    let compress_result = compress_xz(&tar_path, &xz_path).await;
    tokio::fs::remove_file(&tar_path)
        .await
        .map_err(|e| Error::io_with_path(&e, &tar_path))?;
    compress_result?;

    // cosmetic rename, same bytes under the distribution suffix
    tokio::fs::rename(&xz_path, &package_path)
        .await
        .map_err(|e| Error::io_with_path(&e, &package_path))?;
    Ok(package_path)
}

async fn create_tar(tar_path: &Path, package_root: &Path, dir_name: &Path) -> Result<()> {
    let file = tokio::fs::File::create(tar_path)
        .await
        .map_err(|e| Error::io_with_path(&e, tar_path))?;
    let file = file.into_std().await;
    let package_root = package_root.to_path_buf();
    let dir_name = dir_name.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut builder = tar::Builder::new(file);
        builder.follow_symlinks(false);
        builder
            .append_dir_all(&dir_name, &package_root)
            .map_err(|e| PackError::ArchiveFailed {
                message: e.to_string(),
            })?;
        builder.finish().map_err(|e| PackError::ArchiveFailed {
            message: e.to_string(),
        })?;
        Ok(())
    })
    .await
    .map_err(|e| Error::internal(format!("tar task failed: {e}")))??;

    Ok(())
}

async fn compress_xz(input: &Path, output: &Path) -> Result<()> {
    use async_compression::tokio::write::XzEncoder;
    use tokio::io::{AsyncWriteExt, BufReader};

    let input_file = tokio::fs::File::open(input)
        .await
        .map_err(|e| Error::io_with_path(&e, input))?;
    let output_file = tokio::fs::File::create(output)
        .await
        .map_err(|e| Error::io_with_path(&e, output))?;

    let mut encoder = XzEncoder::new(output_file);
    let mut reader = BufReader::new(input_file);
    tokio::io::copy(&mut reader, &mut encoder)
        .await
        .map_err(|e| PackError::CompressionFailed {
            message: e.to_string(),
        })?;
    encoder
        .shutdown()
        .await
        .map_err(|e| PackError::CompressionFailed {
            message: e.to_string(),
        })?;

    Ok(())
}
