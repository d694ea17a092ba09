//! Well-known paths inside a package directory

/// Package descriptor file
pub const PKGINFO: &str = "metadata/PKGINFO";

/// File-tree manifest written after a successful build
pub const PKGTREE: &str = "metadata/PKGTREE";

/// Runtime dependency list, one package name per line
pub const PKGDEPS: &str = "metadata/PKGDEPS";

/// Externally authored build script
pub const BUILD_SCRIPT: &str = "scripts/PKGBUILD";

/// Ephemeral build directory, removed after a successful snapshot
pub const BUILD_DIR: &str = "build";

/// Work directory the build script runs in
pub const WORK_DIR: &str = "build/work";

/// Directory the build script installs into
pub const DATA_DIR: &str = "data";

/// Captured build script stdout, overwritten on every attempt
pub const STDOUT_LOG: &str = "build.stdout.log";

/// Captured build script stderr, overwritten on every attempt
pub const STDERR_LOG: &str = "build.stderr.log";

/// Default location of the installed-package registry
pub const DEFAULT_REGISTRY: &str = "/var/evox/packages";

/// Distribution package suffix the compressed archive is renamed to
pub const PACKAGE_EXT: &str = "evx";
