//! Build pipeline orchestration
//!
//! The phases run strictly in sequence; each completes (including
//! subprocess exit) before the next begins. Fatal errors leave the package
//! directory retryable: the stale `build/` tree is removed at the start of
//! the next attempt.

use crate::context::BuildContext;
use crate::inspect::{ElfInspector, SystemStrip};
use crate::packaging;
use crate::post;
use crate::registry::InstalledRegistry;
use crate::resolve::resolve_runtime_deps;
use crate::{fetch, sandbox};
use evoke_errors::Result;
use evoke_metadata::{paths, write_pkgdeps, FileTreeManifest, PackageMetadata};
use evoke_net::NetClient;
use std::path::{Path, PathBuf};

/// Summary of a completed build
#[derive(Debug)]
pub struct BuildReport {
    /// Path of the produced `.evx` archive
    pub archive: PathBuf,
    /// Runtime dependencies written to PKGDEPS
    pub dependencies: Vec<String>,
    /// Number of PKGTREE entries (including the root marker)
    pub manifest_entries: usize,
    /// Number of binaries stripped
    pub stripped: usize,
}

/// Build pipeline entry point
pub struct Builder {
    net: NetClient,
    registry: InstalledRegistry,
}

impl Builder {
    /// Builder with default network configuration and the system registry.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Ok(Self {
            net: NetClient::with_defaults()?,
            registry: InstalledRegistry::default_location(),
        })
    }

    /// Use a different installed-package registry
    #[must_use]
    pub fn with_registry(mut self, registry: InstalledRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a preconfigured network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = net;
        self
    }

    /// Run the whole pipeline for the package rooted at `package_root`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any phase: `MetadataError`,
    /// `NetworkError`, `BuildError` or `PackError`. Build logs stay on
    /// disk for diagnosis whenever the script itself ran.
    pub async fn build(&self, package_root: &Path) -> Result<BuildReport> {
        let meta = PackageMetadata::load(&package_root.join(paths::PKGINFO)).await?;
        let id = meta.id();
        tracing::info!(package = %id, "building package");

        let ctx = BuildContext::new(package_root, id.clone())?;
        sandbox::prepare(&ctx).await?;

        let urls = meta.source.resolve(&id.name, &id.version);
        fetch::fetch_sources(&self.net, &urls, &ctx.build_dir).await?;

        tracing::info!("running build script");
        let env = sandbox::script_environment(&ctx, std::env::var("JOBS").ok().as_deref());
        let output = sandbox::run_script(&ctx, &env).await?;
        sandbox::persist_logs(&ctx, &output).await?;
        sandbox::check_status(&output)?;

        tracing::info!("generating package tree");
        let manifest = FileTreeManifest::snapshot(&ctx.data_dir)?;
        manifest
            .write(&ctx.package_root.join(paths::PKGTREE))
            .await?;
        sandbox::teardown(&ctx).await?;

        tracing::info!("detecting runtime dependencies");
        let strip = SystemStrip::locate();
        if strip.is_none() {
            tracing::warn!("strip not found in PATH, binaries will not be stripped");
        }
        let report = post::process_tree(&ctx.data_dir, &ElfInspector, strip.as_ref()).await?;

        let installed = self.registry.load().await?;
        let deps = resolve_runtime_deps(&report.needed, &installed, &id, &meta.rundeps);
        write_pkgdeps(&ctx.package_root.join(paths::PKGDEPS), &deps).await?;

        manifest.validate()?;

        tracing::info!("generating package archive");
        let archive = packaging::archive_package(&ctx.package_root, &id).await?;
        tracing::info!(archive = %archive.display(), "package built");

        Ok(BuildReport {
            archive,
            dependencies: deps.into_names(),
            manifest_entries: manifest.len(),
            stripped: report.stripped,
        })
    }
}
