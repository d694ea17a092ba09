//! Runtime dependency resolution
//!
//! Cross-references the needed SONAMEs collected from a package's binaries
//! against the installed-package registry. A SONAME is owned by the first
//! package whose manifest lists a file with exactly that final path
//! segment. Unresolved SONAMEs are expected (a provider may not register
//! its internal library paths) and are omitted, not errors.

use crate::registry::InstalledPackage;
use evoke_types::{is_lib32, strip_lib32, DependencySet, PackageId};

/// Compute the runtime dependency set of the package being built.
///
/// `declared` seeds the set with the rundeps from PKGINFO; discovered
/// owners are appended. The building package never depends on itself.
#[must_use]
pub fn resolve_runtime_deps(
    needed: &[String],
    installed: &[InstalledPackage],
    id: &PackageId,
    declared: &[String],
) -> DependencySet {
    let mut deps = DependencySet::new(&id.name).with_declared(declared);
    let building_lib32 = id.is_lib32();

    for soname in needed {
        match find_owner(soname, installed, building_lib32) {
            Some(owner) => {
                deps.insert(owner);
            }
            None => {
                tracing::debug!(soname = %soname, "no installed package provides needed library");
            }
        }
    }
    deps
}

fn find_owner<'a>(
    soname: &str,
    installed: &'a [InstalledPackage],
    building_lib32: bool,
) -> Option<&'a str> {
    for pkg in installed {
        if !pkg.manifest.owns(soname) {
            continue;
        }
        if building_lib32 {
            // a 32-bit variant must link against 32-bit providers
            if !is_lib32(&pkg.name) {
                continue;
            }
        } else if let Some(native) = strip_lib32(&pkg.name) {
            // prefer the native-architecture owner when one is installed
            if installed.iter().any(|p| p.name == native) {
                continue;
            }
        }
        return Some(&pkg.name);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoke_metadata::FileTreeManifest;

    fn pkg(name: &str, files: &[&str]) -> InstalledPackage {
        let mut text = String::from(".\n");
        for file in files {
            text.push_str(file);
            text.push('\n');
        }
        InstalledPackage {
            name: name.to_string(),
            manifest: FileTreeManifest::parse(&text),
        }
    }

    fn needed(sonames: &[&str]) -> Vec<String> {
        sonames.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_unresolved_soname_is_omitted() {
        let installed = vec![pkg("foo-lib", &["./usr/lib/libfoo.so.1"])];
        let id = PackageId::new("app", "1.0");
        let deps = resolve_runtime_deps(
            &needed(&["libc.so.6", "libfoo.so.1"]),
            &installed,
            &id,
            &[],
        );
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["foo-lib"]);
    }

    #[test]
    fn test_owner_recorded_once_for_multiple_sonames() {
        let installed = vec![pkg(
            "glibc",
            &["./usr/lib/libc.so.6", "./usr/lib/libm.so.6"],
        )];
        let id = PackageId::new("app", "1.0");
        let deps = resolve_runtime_deps(
            &needed(&["libc.so.6", "libm.so.6"]),
            &installed,
            &id,
            &[],
        );
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_self_satisfying_package_is_excluded() {
        let installed = vec![pkg("foo-lib", &["./usr/lib/libfoo.so.1"])];
        let id = PackageId::new("foo-lib", "2.0");
        let deps = resolve_runtime_deps(&needed(&["libfoo.so.1"]), &installed, &id, &[]);
        assert!(deps.is_empty());
    }

    #[test]
    fn test_lib32_package_only_takes_lib32_owners() {
        let installed = vec![
            pkg("baz", &["./usr/lib/libbaz.so.2"]),
            pkg("lib32-baz", &["./usr/lib32/libbaz.so.2"]),
        ];
        let id = PackageId::new("lib32-bar", "1.0");
        let deps = resolve_runtime_deps(&needed(&["libbaz.so.2"]), &installed, &id, &[]);
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["lib32-baz"]);
    }

    #[test]
    fn test_native_package_skips_lib32_owner_when_native_exists() {
        // sorted registry order puts lib32-baz first; the native owner must
        // still win for a native package
        let installed = vec![
            pkg("lib32-baz", &["./usr/lib32/libbaz.so.2"]),
            pkg("baz", &["./usr/lib/libbaz.so.2"]),
        ];
        let id = PackageId::new("bar", "1.0");
        let deps = resolve_runtime_deps(&needed(&["libbaz.so.2"]), &installed, &id, &[]);
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["baz"]);
    }

    #[test]
    fn test_native_package_accepts_lib32_owner_without_native_twin() {
        let installed = vec![pkg("lib32-baz", &["./usr/lib32/libbaz.so.2"])];
        let id = PackageId::new("bar", "1.0");
        let deps = resolve_runtime_deps(&needed(&["libbaz.so.2"]), &installed, &id, &[]);
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["lib32-baz"]);
    }

    #[test]
    fn test_declared_rundeps_come_first() {
        let installed = vec![pkg("zlib", &["./usr/lib/libz.so.1"])];
        let id = PackageId::new("app", "1.0");
        let declared = vec!["readline".to_string()];
        let deps = resolve_runtime_deps(&needed(&["libz.so.1"]), &installed, &id, &declared);
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["readline", "zlib"]);
    }
}
