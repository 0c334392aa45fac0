//! Prim paths.
//!
//! A [`PrimPath`] names one prim in the scene hierarchy (`/World/groom/hair`).
//! The same type is used for cache paths; the two usually coincide but an
//! adapter is free to return a different cache path from `populate`.

use std::fmt;
use std::sync::Arc;

use crate::util::{Error, Result};

/// Path separator.
pub const SEPARATOR: char = '/';

/// Absolute, hierarchical prim path.
///
/// Cloning is cheap (shared string). Equality and hashing are on the full
/// textual path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimPath(Arc<str>);

impl PrimPath {
    /// Parse and validate an absolute path.
    pub fn new(path: &str) -> Result<Self> {
        if !path.starts_with(SEPARATOR) {
            return Err(Error::invalid_path(format!("'{}' is not absolute", path)));
        }
        if path.len() > 1 {
            if path.ends_with(SEPARATOR) {
                return Err(Error::invalid_path(format!("'{}' has a trailing separator", path)));
            }
            for part in path[1..].split(SEPARATOR) {
                if part.is_empty() || part == "." || part == ".." {
                    return Err(Error::invalid_path(format!(
                        "'{}' has an invalid component '{}'",
                        path, part
                    )));
                }
            }
        }
        Ok(Self(Arc::from(path)))
    }

    /// The absolute root path `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Full path text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the root path.
    #[inline]
    pub fn is_root(&self) -> bool {
        &*self.0 == "/"
    }

    /// Last path component (empty for the root).
    pub fn name(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(Arc::from(&self.0[..idx]))),
            None => None,
        }
    }

    /// This path and each ancestor below the root, nearest first.
    pub fn ancestors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut current = Some(self.clone());
        while let Some(path) = current {
            if path.is_root() {
                break;
            }
            current = path.parent();
            out.push(path);
        }
        out
    }

    /// Append a child component.
    pub fn append_child(&self, name: &str) -> Result<Self> {
        if self.is_root() {
            Self::new(&format!("/{}", name))
        } else {
            Self::new(&format!("{}/{}", self.0, name))
        }
    }

    /// Check if `prefix` is this path or one of its ancestors.
    pub fn has_prefix(&self, prefix: &PrimPath) -> bool {
        if prefix.is_root() {
            return true;
        }
        match self.0.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
            None => false,
        }
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl std::str::FromStr for PrimPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
