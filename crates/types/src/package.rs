//! Package identity types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Naming prefix marking the 32-bit variant of a package
pub const LIB32_PREFIX: &str = "lib32-";

/// Unique identifier for a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    /// Create a new package ID
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Whether this package is a 32-bit variant
    #[must_use]
    pub fn is_lib32(&self) -> bool {
        is_lib32(&self.name)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Whether a package name carries the 32-bit variant prefix
#[must_use]
pub fn is_lib32(name: &str) -> bool {
    name.starts_with(LIB32_PREFIX)
}

/// The native-architecture name for a 32-bit variant, or `None` when the
/// name does not carry the prefix
#[must_use]
pub fn strip_lib32(name: &str) -> Option<&str> {
    name.strip_prefix(LIB32_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_id_display() {
        let id = PackageId::new("zlib", "1.3.1");
        assert_eq!(id.to_string(), "zlib-1.3.1");
    }

    #[test]
    fn test_lib32_detection() {
        assert!(is_lib32("lib32-glibc"));
        assert!(!is_lib32("glibc"));
        assert_eq!(strip_lib32("lib32-glibc"), Some("glibc"));
        assert_eq!(strip_lib32("glibc"), None);
    }
}
