//! Package skeleton scaffolding
//!
//! App-layer convenience; the build pipeline itself only ever reads the
//! files created here.

use evoke_errors::{Error, Result};
use evoke_metadata::SourceSpec;
use std::path::{Path, PathBuf};

pub struct CreateRequest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub source: String,
    pub maintainer: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
}

/// Create `<name>/` with the standard `metadata/`, `data/` and `scripts/`
/// layout and a fresh PKGINFO at `pkgrel = 1`.
///
/// # Errors
///
/// Returns an error when the directory already exists or cannot be
/// created.
pub async fn create_package(req: &CreateRequest) -> Result<PathBuf> {
    let root = PathBuf::from(&req.name);
    if root.exists() {
        return Err(Error::internal(format!(
            "directory {} already exists",
            root.display()
        )));
    }

    for dir in ["metadata", "data", "scripts"] {
        tokio::fs::create_dir_all(root.join(dir))
            .await
            .map_err(|e| Error::io_with_path(&e, root.join(dir)))?;
    }

    let pkginfo = render_pkginfo(req);
    let path = root.join("metadata/PKGINFO");
    tokio::fs::write(&path, pkginfo)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;

    write_script_stub(&root).await?;
    Ok(root)
}

fn render_pkginfo(req: &CreateRequest) -> String {
    let mut text = String::new();
    text.push_str(&format!("name = {}\n", req.name));
    text.push_str(&format!("version = {}\n", req.version));
    text.push_str("pkgrel = 1\n");
    text.push_str(&format!("description = {}\n", req.description));
    text.push_str(&format!(
        "source = {}\n",
        SourceSpec::templatize(&req.source, &req.name, &req.version)
    ));
    if let Some(maintainer) = &req.maintainer {
        text.push_str(&format!("maintainer = {maintainer}\n"));
    }
    if let Some(license) = &req.license {
        text.push_str(&format!("license = {license}\n"));
    }
    if let Some(url) = &req.url {
        text.push_str(&format!("url = {url}\n"));
    }
    text
}

async fn write_script_stub(root: &Path) -> Result<()> {
    let path = root.join("scripts/PKGBUILD");
    let stub = "# build commands go here; install into \"$PKG\"\n";
    tokio::fs::write(&path, stub)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}
