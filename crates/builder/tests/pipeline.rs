//! End-to-end pipeline tests against a local package fixture.
//!
//! The fixture declares an empty source list so no network is involved;
//! the build script fabricates the installed tree directly.

use evoke_builder::{Builder, InstalledRegistry};
use evoke_errors::{BuildError, Error, PackError};
use std::path::Path;

async fn write_package(root: &Path, pkginfo: &str, script: &str) {
    tokio::fs::create_dir_all(root.join("metadata")).await.unwrap();
    tokio::fs::create_dir_all(root.join("scripts")).await.unwrap();
    tokio::fs::create_dir_all(root.join("data")).await.unwrap();
    tokio::fs::write(root.join("metadata/PKGINFO"), pkginfo)
        .await
        .unwrap();
    tokio::fs::write(root.join("scripts/PKGBUILD"), script)
        .await
        .unwrap();
}

fn builder(registry_root: &Path) -> Builder {
    Builder::new()
        .unwrap()
        .with_registry(InstalledRegistry::new(registry_root))
}

#[tokio::test]
async fn test_successful_build_produces_archive_and_manifests() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("hello");
    write_package(
        &root,
        "name = hello\nversion = 2.12\npkgrel = 1\ndescription = test\nsource = ()\nrundeps = (glibc)\n",
        "mkdir -p \"$PKG/usr/bin\"\necho hi > \"$PKG/usr/bin/hello\"\n",
    )
    .await;
    let registry = tmp.path().join("registry");
    tokio::fs::create_dir_all(&registry).await.unwrap();

    let report = builder(&registry).build(&root).await.unwrap();

    assert_eq!(report.archive, tmp.path().join("hello-2.12.evx"));
    assert!(report.archive.is_file());
    assert_eq!(report.dependencies, vec!["glibc"]);

    // snapshot captured the installed tree, build dir is gone
    let tree = tokio::fs::read_to_string(root.join("metadata/PKGTREE"))
        .await
        .unwrap();
    assert!(tree.starts_with(".\n"));
    assert!(tree.contains("./usr/bin/hello"));
    assert!(!root.join("build").exists());

    let deps = tokio::fs::read_to_string(root.join("metadata/PKGDEPS"))
        .await
        .unwrap();
    assert_eq!(deps, "glibc\n");
}

#[tokio::test]
async fn test_failed_script_leaves_logs_and_no_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("broken");
    write_package(
        &root,
        "name = broken\nversion = 0.1\npkgrel = 1\ndescription = test\nsource = ()\n",
        "echo attempting\necho no good >&2\nexit 7\n",
    )
    .await;
    let registry = tmp.path().join("registry");
    tokio::fs::create_dir_all(&registry).await.unwrap();

    let err = builder(&registry).build(&root).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::ScriptFailed { code: 7 })
    ));

    assert!(!tmp.path().join("broken-0.1.evx").exists());
    let stdout = tokio::fs::read_to_string(root.join("build.stdout.log"))
        .await
        .unwrap();
    let stderr = tokio::fs::read_to_string(root.join("build.stderr.log"))
        .await
        .unwrap();
    assert!(stdout.contains("attempting"));
    assert!(stderr.contains("no good"));

    // the stale build dir must not block a retry
    assert!(root.join("build").exists());
    write_package(
        &root,
        "name = broken\nversion = 0.1\npkgrel = 1\ndescription = test\nsource = ()\n",
        "mkdir -p \"$PKG/etc\"\necho ok > \"$PKG/etc/broken.conf\"\n",
    )
    .await;
    let report = builder(&registry).build(&root).await.unwrap();
    assert!(report.archive.is_file());
}

#[tokio::test]
async fn test_empty_tree_fails_without_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("noop");
    write_package(
        &root,
        "name = noop\nversion = 1\npkgrel = 1\ndescription = test\nsource = ()\n",
        "true\n",
    )
    .await;
    let registry = tmp.path().join("registry");
    tokio::fs::create_dir_all(&registry).await.unwrap();

    let err = builder(&registry).build(&root).await.unwrap_err();
    assert!(matches!(err, Error::Pack(PackError::EmptyTree)));
    assert!(!tmp.path().join("noop-1.evx").exists());
}
