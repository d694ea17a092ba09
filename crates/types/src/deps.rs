//! Runtime dependency set

use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of runtime dependency package names.
///
/// The set knows the name of the package being built and silently drops any
/// attempt to insert it, so a package can never depend on itself even when
/// one of its own files satisfies a needed library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySet {
    owner: String,
    names: Vec<String>,
}

impl DependencySet {
    /// Create an empty set owned by the package being built
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            names: Vec::new(),
        }
    }

    /// Seed the set with dependencies declared in the metadata
    #[must_use]
    pub fn with_declared(mut self, declared: &[String]) -> Self {
        for name in declared {
            self.insert(name);
        }
        self
    }

    /// Insert a package name, preserving first-seen order.
    ///
    /// Returns `true` if the name was actually added; duplicates and the
    /// owner's own name are rejected.
    pub fn insert(&mut self, name: &str) -> bool {
        if name.is_empty() || name == self.owner || self.names.iter().any(|n| n == name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Whether the set already contains a name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}
