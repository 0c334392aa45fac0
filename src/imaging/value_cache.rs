//! Per-path render value cache.
//!
//! The adapter writes render-ready values here during an update; the render
//! side reads them back by cache path. Entries are created lazily and each
//! one is locked independently (see [`PathTable`]), so worker threads can
//! fill disjoint paths in parallel.

use crate::core::{DirtyBits, PathTable, PrimPath, Shared};
use crate::util::{Mat4, Vec3};

use super::primvar::PrimvarSet;
use super::topology::BasisCurvesTopology;

/// Cached render values for one cache path.
///
/// A slot is `None` until it is prepared or first written. `valid` holds the
/// channels whose slot was successfully filled by the most recent update that
/// touched them.
#[derive(Clone, Debug, Default)]
pub struct CacheEntry {
    pub points: Option<Vec<Vec3>>,
    pub topology: Option<BasisCurvesTopology>,
    pub widths: Option<Vec<f32>>,
    pub normals: Option<Vec<Vec3>>,
    pub transform: Option<Mat4>,
    pub visible: Option<bool>,
    pub display_color: Option<Vec<Vec3>>,
    pub primvars: PrimvarSet,
    pub valid: DirtyBits,
}

impl CacheEntry {
    /// Points slot, created empty if needed.
    pub fn points_mut(&mut self) -> &mut Vec<Vec3> {
        self.points.get_or_insert_with(Vec::new)
    }

    /// Topology slot, created empty if needed.
    pub fn topology_mut(&mut self) -> &mut BasisCurvesTopology {
        self.topology.get_or_insert_with(BasisCurvesTopology::default)
    }

    /// Widths slot, created empty if needed.
    pub fn widths_mut(&mut self) -> &mut Vec<f32> {
        self.widths.get_or_insert_with(Vec::new)
    }

    /// Normals slot, created empty if needed.
    pub fn normals_mut(&mut self) -> &mut Vec<Vec3> {
        self.normals.get_or_insert_with(Vec::new)
    }

    /// Transform slot, created as identity if needed.
    pub fn transform_mut(&mut self) -> &mut Mat4 {
        self.transform.get_or_insert(Mat4::IDENTITY)
    }

    /// Visibility slot, created visible if needed.
    pub fn visible_mut(&mut self) -> &mut bool {
        self.visible.get_or_insert(true)
    }

    /// Display color slot, created empty if needed.
    pub fn display_color_mut(&mut self) -> &mut Vec<Vec3> {
        self.display_color.get_or_insert_with(Vec::new)
    }

    /// Make sure a slot exists for every channel in `channels`.
    pub fn prepare(&mut self, channels: DirtyBits) {
        if channels.contains(DirtyBits::POINTS) {
            self.points_mut();
        }
        if channels.contains(DirtyBits::TOPOLOGY) {
            self.topology_mut();
        }
        if channels.contains(DirtyBits::WIDTHS) {
            self.widths_mut();
        }
        if channels.contains(DirtyBits::NORMALS) {
            self.normals_mut();
        }
        if channels.contains(DirtyBits::TRANSFORM) {
            self.transform_mut();
        }
        if channels.contains(DirtyBits::VISIBILITY) {
            self.visible_mut();
        }
        if channels.contains(DirtyBits::PRIMVAR) {
            self.display_color_mut();
        }
    }
}

/// Thread-safe map from cache path to [`CacheEntry`].
#[derive(Default)]
pub struct ValueCache {
    entries: PathTable<CacheEntry>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `cache_path`, created on first use.
    #[inline]
    pub fn entry(&self, cache_path: &PrimPath) -> Shared<CacheEntry> {
        self.entries.get_or_default(cache_path)
    }

    /// Entry for `cache_path` if it exists.
    #[inline]
    pub fn get(&self, cache_path: &PrimPath) -> Option<Shared<CacheEntry>> {
        self.entries.get(cache_path)
    }

    /// Run `f` with exclusive access to the entry, creating it if needed.
    pub fn with_entry<T>(&self, cache_path: &PrimPath, f: impl FnOnce(&mut CacheEntry) -> T) -> T {
        let entry = self.entry(cache_path);
        let mut guard = entry.lock();
        f(&mut guard)
    }

    /// Clone of the entry, for readers that want a consistent snapshot.
    pub fn snapshot(&self, cache_path: &PrimPath) -> Option<CacheEntry> {
        self.entries.get(cache_path).map(|e| e.lock().clone())
    }

    /// Drop entries for `cache_path` and its descendants.
    pub fn remove_subtree(&self, cache_path: &PrimPath) -> usize {
        self.entries.remove_subtree(cache_path)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached paths, sorted.
    pub fn paths(&self) -> Vec<PrimPath> {
        self.entries.paths()
    }
}
