//! PKGINFO descriptor parsing and rewriting
//!
//! PKGINFO is a line-oriented `field = value` file. Parsing produces a typed
//! record plus the original lines, so a load/save round trip reproduces the
//! file byte for byte apart from intentionally mutated fields. Lines with
//! unrecognized keys pass through untouched.

use crate::source::SourceSpec;
use crate::split_value;
use evoke_errors::{Error, MetadataError, Result};
use evoke_types::PackageId;
use std::path::Path;

const FIELD_SEPARATOR: &str = " = ";

/// Typed view over a package's PKGINFO file
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    /// Monotonic rebuild counter (`pkgrel`)
    pub release: u32,
    pub description: String,
    pub source: SourceSpec,
    /// Build-time dependency names, in declaration order
    pub makedepends: Vec<String>,
    /// Declared runtime dependencies; auto-discovery appends to these
    pub rundeps: Vec<String>,
    pub maintainer: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    /// Original file lines, kept for order-preserving rewrite
    lines: Vec<String>,
}

impl PackageMetadata {
    /// Parse PKGINFO text into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` when a required field (`name`, `version`,
    /// `source`) is missing, a recognized field has an empty value, or
    /// `pkgrel` is not a number.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<String> = text.lines().map(ToString::to_string).collect();

        let mut name = None;
        let mut version = None;
        let mut release = 1u32;
        let mut description = String::new();
        let mut source = None;
        let mut makedepends = Vec::new();
        let mut rundeps = Vec::new();
        let mut maintainer = None;
        let mut license = None;
        let mut homepage = None;

        for (idx, line) in lines.iter().enumerate() {
            let Some((key, value)) = split_field(line) else {
                continue;
            };
            if value.is_empty() {
                return Err(MetadataError::MalformedLine {
                    line: idx + 1,
                    content: line.clone(),
                }
                .into());
            }
            match key {
                "name" => name = Some(value.to_string()),
                "version" => version = Some(value.to_string()),
                "pkgrel" => {
                    release = value.parse().map_err(|_| MetadataError::InvalidRelease {
                        value: value.to_string(),
                    })?;
                }
                "description" => description = value.to_string(),
                "source" => source = Some(SourceSpec::parse(value)),
                "makedepends" => makedepends = split_value(value),
                "maintainer" => maintainer = Some(value.to_string()),
                "license" => license = Some(value.to_string()),
                "url" => homepage = Some(value.to_string()),
                key if key.starts_with("run") => rundeps = split_value(value),
                _ => {}
            }
        }

        let missing = |field: &str| {
            Error::from(MetadataError::MissingField {
                field: field.to_string(),
            })
        };

        Ok(Self {
            name: name.ok_or_else(|| missing("name"))?,
            version: version.ok_or_else(|| missing("version"))?,
            release,
            description,
            source: source.ok_or_else(|| missing("source"))?,
            makedepends,
            rundeps,
            maintainer,
            license,
            homepage,
            lines,
        })
    }

    /// Load PKGINFO from disk.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::ReadFailed` when the file cannot be read and
    /// parse errors as described in [`PackageMetadata::parse`].
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MetadataError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::parse(&text)
    }

    /// Render the file back out, substituting the current release into the
    /// `pkgrel` line and leaving every other line verbatim.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if matches!(split_field(line), Some(("pkgrel", _))) {
                out.push_str(&format!("pkgrel = {}\n", self.release));
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Write the file back to disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }

    /// Identity of the package described by this metadata
    #[must_use]
    pub fn id(&self) -> PackageId {
        PackageId::new(self.name.clone(), self.version.clone())
    }
}

/// Bump the `pkgrel` counter in a PKGINFO file by one.
///
/// Reads, modifies and rewrites the file; every line other than `pkgrel`
/// passes through untouched. Returns the new release number.
///
/// # Errors
///
/// Returns `MetadataError::MissingField` when no `pkgrel` line exists and
/// `MetadataError::InvalidRelease` when its value is not a number.
pub async fn increment_release(path: &Path) -> Result<u32> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MetadataError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut new_release = None;
    let mut out = String::new();
    for line in text.lines() {
        if let Some(("pkgrel", value)) = split_field(line) {
            let release: u32 = value.parse().map_err(|_| MetadataError::InvalidRelease {
                value: value.to_string(),
            })?;
            new_release = Some(release + 1);
            out.push_str(&format!("pkgrel = {}\n", release + 1));
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }

    let Some(release) = new_release else {
        return Err(MetadataError::MissingField {
            field: "pkgrel".to_string(),
        }
        .into());
    };

    tokio::fs::write(path, out)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;
    Ok(release)
}

fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(FIELD_SEPARATOR)?;
    Some((key.trim(), value.trim()))
}
