//! Virtual hierarchical paths over a flat object namespace.
//!
//! The object store has no folders, only flat keys. [`VirtualPath`] is the
//! normalized user-facing path; the *storage hierarchy path* derived from it
//! (trailing slash appended) is the key prefix convention that makes the
//! flat namespace look like a tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized, user-facing hierarchical path.
///
/// Invariants: always begins with `/`; never ends with `/` except the root
/// path, which is exactly `/`. Construction goes through
/// [`VirtualPath::normalize`], which is pure, total, and idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualPath(String);

impl VirtualPath {
    /// The root path, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Normalize an arbitrary user-entered or URL-derived path string.
    ///
    /// Strips duplicate, leading, and trailing slashes; the empty result
    /// becomes the root path. `normalize(normalize(p)) == normalize(p)`.
    pub fn normalize(raw: &str) -> Self {
        let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            Self::root()
        } else {
            Self(format!("/{}", segments.join("/")))
        }
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The storage-key prefix form: identity for root, otherwise the path
    /// with exactly one trailing slash.
    pub fn storage_hierarchy_path(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}/", self.0)
        }
    }

    /// Append a child name, normalizing the result.
    pub fn join(&self, name: &str) -> Self {
        Self::normalize(&format!("{}/{}", self.0, name))
    }

    /// The containing path, or `None` for root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// The final path segment, or `None` for root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.0.rsplit('/').next()
        }
    }

    /// The path segments, in order. Empty for root.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Whether `other` lies strictly below this path.
    pub fn contains(&self, other: &VirtualPath) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.starts_with(&self.storage_hierarchy_path())
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for VirtualPath {
    fn default() -> Self {
        Self::root()
    }
}
