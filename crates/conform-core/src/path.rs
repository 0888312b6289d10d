//! # Field Paths
//!
//! A dotted/bracketed accumulator (`.contact.value`, `.hobbies[1]`) built
//! while the matcher descends. Paths exist only for diagnostics: they never
//! influence matching, and each recursive step builds a new path rather than
//! mutating its parent's.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a value relative to the root of the document being matched.
///
/// The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The root path.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a mapping entry below this one: `<self>.<key>`.
    pub fn key(&self, key: &str) -> Self {
        let mut s = String::with_capacity(self.0.len() + key.len() + 1);
        s.push_str(&self.0);
        s.push('.');
        s.push_str(key);
        Self(s)
    }

    /// Path of a sequence element below this one: `<self>[<index>]`.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the rendered path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let p = FieldPath::root();
        assert!(p.is_root());
        assert_eq!(p.as_str(), "");
    }

    #[test]
    fn test_nested_keys_and_indices() {
        let p = FieldPath::root().key("users").index(3).key("name");
        assert_eq!(p.to_string(), ".users[3].name");
        assert!(!p.is_root());
    }

    #[test]
    fn test_children_do_not_mutate_parent() {
        let parent = FieldPath::root().key("a");
        let _child = parent.key("b");
        assert_eq!(parent.as_str(), ".a");
    }
}
