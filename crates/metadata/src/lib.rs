#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package metadata handling for evoke
//!
//! This crate owns the on-disk formats under a package's `metadata/`
//! directory: the PKGINFO descriptor (`field = value` lines), the PKGTREE
//! file-tree manifest and the PKGDEPS runtime dependency list.

mod depsfile;
mod manifest;
mod pkginfo;
mod source;

pub mod paths;

pub use depsfile::write_pkgdeps;
pub use manifest::FileTreeManifest;
pub use pkginfo::{increment_release, PackageMetadata};
pub use source::{SourceSpec, NAME_TOKEN, VERSION_TOKEN};

/// Split a PKGINFO value into list elements.
///
/// A value wrapped in parentheses holds space-separated tokens; a bare value
/// is a single-element list.
pub(crate) fn split_value(value: &str) -> Vec<String> {
    let value = value.trim();
    if let Some(inner) = value
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        inner
            .split_whitespace()
            .map(ToString::to_string)
            .collect()
    } else if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}
