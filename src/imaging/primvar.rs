//! Primvar descriptors.
//!
//! A prim's primvars are kept as an ordered set keyed by name. Merging a
//! descriptor whose name is already present updates that entry in place, so
//! the position of every other entry is unchanged.

use smallvec::SmallVec;

use crate::core::Interpolation;

/// Primvar names the curves adapter publishes.
pub const POINTS_PRIMVAR: &str = "points";
pub const WIDTHS_PRIMVAR: &str = "widths";
pub const NORMALS_PRIMVAR: &str = "normals";
pub const DISPLAY_COLOR_PRIMVAR: &str = "displayColor";

/// One named, interpolation-tagged channel. The data lives in the matching
/// cache slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimvarDescriptor {
    pub name: String,
    pub interpolation: Interpolation,
}

impl PrimvarDescriptor {
    pub fn new(name: impl Into<String>, interpolation: Interpolation) -> Self {
        Self {
            name: name.into(),
            interpolation,
        }
    }
}

/// Ordered primvar set with unique names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrimvarSet {
    entries: SmallVec<[PrimvarDescriptor; 4]>,
}

impl PrimvarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `primvar`, or replace the entry with the same name in place.
    pub fn merge(&mut self, primvar: PrimvarDescriptor) {
        match self.entries.iter_mut().find(|p| p.name == primvar.name) {
            Some(existing) => *existing = primvar,
            None => self.entries.push(primvar),
        }
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&PrimvarDescriptor> {
        self.entries.iter().find(|p| p.name == name)
    }

    /// Remove a descriptor by name, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<PrimvarDescriptor> {
        let idx = self.entries.iter().position(|p| p.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrimvarDescriptor> {
        self.entries.iter()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.name.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
