//! Source URL templates
//!
//! The `source` field of PKGINFO holds one or more URL templates in which
//! `$name` and `$version` stand for the package's name and version. Keeping
//! the placeholders in the stored form lets a version bump re-resolve the
//! same template.

use crate::split_value;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the package name
pub const NAME_TOKEN: &str = "$name";

/// Placeholder replaced with the package version
pub const VERSION_TOKEN: &str = "$version";

/// One or more templated source URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    templates: Vec<String>,
}

impl SourceSpec {
    /// Parse a PKGINFO `source` value (parenthesized list or single URL)
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self {
            templates: split_value(value),
        }
    }

    /// Spec with a single template
    pub fn single(template: impl Into<String>) -> Self {
        Self {
            templates: vec![template.into()],
        }
    }

    /// Substitute every placeholder occurrence and return the concrete URLs
    #[must_use]
    pub fn resolve(&self, name: &str, version: &str) -> Vec<String> {
        self.templates
            .iter()
            .map(|t| t.replace(NAME_TOKEN, name).replace(VERSION_TOKEN, version))
            .collect()
    }

    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Turn a concrete URL back into a template by replacing literal
    /// occurrences of the name and version with placeholders.
    ///
    /// Used when scaffolding a new package from a known-good download URL.
    #[must_use]
    pub fn templatize(url: &str, name: &str, version: &str) -> String {
        url.replace(name, NAME_TOKEN).replace(version, VERSION_TOKEN)
    }
}
