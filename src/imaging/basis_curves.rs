//! Basis curves adapter.
//!
//! Translates a time-sampled basis curves prim into cached render values.
//! The lifecycle per prim is:
//!
//! 1. [`PrimAdapter::populate`] registers a render prim.
//! 2. [`PrimAdapter::probe_variability`] runs once per scene load and records
//!    which channels vary over time.
//! 3. [`PrimAdapter::update_frame`] runs every frame for the requested
//!    channels and returns the channels that are now valid in the cache.
//!
//! Nothing here fails across the host boundary. Authoring errors are logged
//! and replaced by defaults; a missing channel without a sensible default
//! (normals) is reported by clearing its bit in the returned mask.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, error, trace, warn};

use crate::core::{DirtyBits, FromValue, Interpolation, PathTable, PrimPath, TimeCode};
use crate::util::{Mat4, Vec3};

use super::index::{RenderIndex, RprimType, ShaderBinding};
use super::primvar::{
    PrimvarDescriptor, DISPLAY_COLOR_PRIMVAR, NORMALS_PRIMVAR, POINTS_PRIMVAR, WIDTHS_PRIMVAR,
};
use super::reader::{attr, read_as, AttributeReader};
use super::settings::AdapterSettings;
use super::tokens::{self, CurveBasis, CurveType, CurveWrap, RemapDomain};
use super::topology::BasisCurvesTopology;
use super::value_cache::{CacheEntry, ValueCache};
use super::variability::{probe, VariabilityRecord, CURVES_PROBES};

/// Width used when a prim authors none.
pub const DEFAULT_WIDTH: f32 = 1.0;

/// Schema fallbacks for unauthored uniform fields.
const FALLBACK_BASIS: &str = "bezier";
const FALLBACK_TYPE: &str = "cubic";
const FALLBACK_WRAP: &str = "nonperiodic";

/// Visibility tokens.
const VISIBILITY_INHERITED: &str = "inherited";
const VISIBILITY_INVISIBLE: &str = "invisible";

/// Inbound operations every prim adapter offers to the host traversal.
pub trait PrimAdapter {
    /// Register the prim with the render index. Returns the cache path, or
    /// `None` if the index cannot hold this prim type.
    fn populate(&self, path: &PrimPath, index: &dyn RenderIndex) -> Option<PrimPath>;

    /// Load-time preparation before [`Self::probe_variability`].
    fn prepare_variability(&self, path: &PrimPath, requested: DirtyBits);

    /// Probe the requested channels not probed yet. Returns the requested
    /// channels known to vary over time.
    fn probe_variability(&self, path: &PrimPath, requested: DirtyBits) -> DirtyBits;

    /// Allocate slots for the requested channels in the entry at
    /// `cache_path`.
    fn prepare_frame(&self, path: &PrimPath, cache_path: &PrimPath, time: TimeCode, requested: DirtyBits);

    /// Read the requested channels of `path` at `time` into the entry at
    /// `cache_path`. The result is a subset of `requested`.
    fn update_frame(
        &self,
        path: &PrimPath,
        cache_path: &PrimPath,
        time: TimeCode,
        requested: DirtyBits,
    ) -> DirtyBits;
}

/// Where a prim is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Populated or prepared, not probed yet.
    #[default]
    Uninitialized,
    /// Variability known; idle between frames.
    VariabilityProbed,
    /// A frame update is in progress.
    Updating,
}

/// Outcome of reading one channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    /// Authored and varying over time.
    Animated(T),
    /// Authored and constant over time.
    Static(T),
    /// Not authored at this time; the caller applies its fallback.
    Absent,
}

impl<T> Fetched<T> {
    fn classify(value: Option<T>, varying: bool) -> Self {
        match value {
            Some(v) if varying => Self::Animated(v),
            Some(v) => Self::Static(v),
            None => Self::Absent,
        }
    }

    /// The value, if authored.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Animated(v) | Self::Static(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }
}

/// Uniform curve fields, read once at the default time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformCurveFields {
    pub curve_type: CurveType,
    pub basis: CurveBasis,
    pub wrap: CurveWrap,
}

/// Per-prim variability state.
#[derive(Debug, Default)]
struct PrimState {
    phase: Phase,
    /// Channels that have been probed.
    probed: DirtyBits,
    /// Probed channels that vary over time.
    varying: DirtyBits,
    records: Vec<VariabilityRecord>,
    uniform: Option<UniformCurveFields>,
    /// Static channels found absent on their first read.
    static_absent: DirtyBits,
    /// Frame updates currently running on this prim.
    in_flight: u32,
}

impl PrimState {
    /// Probed channels known to be constant over time.
    fn known_static(&self) -> DirtyBits {
        self.probed - self.varying
    }
}

/// Adapter for basis curves prims.
pub struct BasisCurvesAdapter<R> {
    reader: R,
    cache: Arc<ValueCache>,
    states: PathTable<PrimState>,
    settings: AdapterSettings,
}

impl<R: AttributeReader> BasisCurvesAdapter<R> {
    /// Create an adapter writing into `cache`.
    pub fn new(reader: R, cache: Arc<ValueCache>) -> Self {
        Self::with_settings(reader, cache, AdapterSettings::default())
    }

    pub fn with_settings(reader: R, cache: Arc<ValueCache>, settings: AdapterSettings) -> Self {
        Self {
            reader,
            cache,
            states: PathTable::new(),
            settings,
        }
    }

    /// Whether `index` can hold basis curves at all.
    pub fn is_supported(index: &dyn RenderIndex) -> bool {
        index.is_rprim_type_supported(RprimType::BasisCurves)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn cache(&self) -> &Arc<ValueCache> {
        &self.cache
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Lifecycle phase of `path` (`Uninitialized` if unknown).
    pub fn phase(&self, path: &PrimPath) -> Phase {
        self.states
            .get(path)
            .map(|s| s.lock().phase)
            .unwrap_or_default()
    }

    /// Channels of `path` probed as time-varying.
    pub fn varying_bits(&self, path: &PrimPath) -> DirtyBits {
        self.states
            .get(path)
            .map(|s| s.lock().varying)
            .unwrap_or_default()
    }

    /// Per-attribute variability records of `path`, in probe order.
    pub fn variability(&self, path: &PrimPath) -> Vec<VariabilityRecord> {
        self.states
            .get(path)
            .map(|s| s.lock().records.clone())
            .unwrap_or_default()
    }

    /// Forget cache entries and variability of `path` and its descendants.
    /// A later probe starts from scratch. Returns the number of cache
    /// entries removed.
    pub fn remove_subtree(&self, path: &PrimPath) -> usize {
        let states = self.states.remove_subtree(path);
        let entries = self.cache.remove_subtree(path);
        debug!(prim = %path, states, entries, "removed subtree");
        entries
    }

    /// Update a batch of `(prim, cache path, requested)` triples, in parallel
    /// once the batch reaches `parallel_threshold`. Results are in input
    /// order.
    pub fn update_frames(&self, requests: &[(PrimPath, PrimPath, DirtyBits)], time: TimeCode) -> Vec<DirtyBits> {
        if requests.len() >= self.settings.parallel_threshold {
            requests
                .par_iter()
                .map(|(path, cache_path, bits)| self.update_frame(path, cache_path, time, *bits))
                .collect()
        } else {
            requests
                .iter()
                .map(|(path, cache_path, bits)| self.update_frame(path, cache_path, time, *bits))
                .collect()
        }
    }

    /// True unless `channel` has been probed and found constant.
    fn is_varying(&self, path: &PrimPath, channel: DirtyBits) -> bool {
        self.states
            .get(path)
            .map(|s| !s.lock().known_static().contains(channel))
            .unwrap_or(true)
    }

    /// Read `attribute` and classify it against the channel's variability.
    pub fn fetch<T: FromValue>(
        &self,
        path: &PrimPath,
        attribute: &str,
        channel: DirtyBits,
        time: TimeCode,
    ) -> Fetched<T> {
        self.fetch_with(path, attribute, time, self.is_varying(path, channel))
    }

    fn fetch_with<T: FromValue>(
        &self,
        path: &PrimPath,
        attribute: &str,
        time: TimeCode,
        varying: bool,
    ) -> Fetched<T> {
        Fetched::classify(read_as(&self.reader, path, attribute, time), varying)
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Topology at `time`. Basis, type and wrap are read at the default time
    /// whatever `time` is; vertex counts at `time`.
    pub fn build_topology(&self, path: &PrimPath, time: TimeCode) -> BasisCurvesTopology {
        let uniform = self.read_uniform_fields(path);
        let varying = self.is_varying(path, DirtyBits::TOPOLOGY);
        self.topology_from(path, uniform, time, varying)
    }

    /// Remap the uniform fields. Unauthored fields take the schema fallback;
    /// unknown tokens are reported and left unset.
    pub fn read_uniform_fields(&self, path: &PrimPath) -> UniformCurveFields {
        let token = |domain: RemapDomain, fallback: &str| -> String {
            read_as::<String>(&self.reader, path, domain.attribute(), TimeCode::Default)
                .unwrap_or_else(|| fallback.to_string())
        };

        UniformCurveFields {
            basis: tokens::remap_or_report(
                path,
                CurveBasis::from_scene_token(&token(RemapDomain::Basis, FALLBACK_BASIS)),
            ),
            curve_type: tokens::remap_or_report(
                path,
                CurveType::from_scene_token(&token(RemapDomain::Type, FALLBACK_TYPE)),
            ),
            wrap: tokens::remap_or_report(
                path,
                CurveWrap::from_scene_token(&token(RemapDomain::Wrap, FALLBACK_WRAP)),
            ),
        }
    }

    fn topology_from(
        &self,
        path: &PrimPath,
        uniform: UniformCurveFields,
        time: TimeCode,
        varying: bool,
    ) -> BasisCurvesTopology {
        let counts = match self.fetch_with::<Vec<i32>>(path, attr::CURVE_VERTEX_COUNTS, time, varying) {
            Fetched::Absent => {
                debug!(prim = %path, "no curveVertexCounts, using empty topology");
                Vec::new()
            }
            fetched => fetched.value().unwrap_or_default(),
        };
        BasisCurvesTopology::new(uniform.curve_type, uniform.basis, uniform.wrap, counts)
    }

    /// Points at `time`; empty (with a warning) if they cannot be read.
    pub fn build_points(&self, path: &PrimPath, time: TimeCode) -> Vec<Vec3> {
        self.points_at(path, time, self.is_varying(path, DirtyBits::POINTS))
    }

    fn points_at(&self, path: &PrimPath, time: TimeCode, varying: bool) -> Vec<Vec3> {
        match self.fetch_with(path, attr::POINTS, time, varying) {
            Fetched::Animated(points) | Fetched::Static(points) => points,
            Fetched::Absent => {
                if self.settings.warn_on_missing_points {
                    warn!("Points could not be read from prim: <{}>", path);
                }
                Vec::new()
            }
        }
    }

    /// Authored widths tagged `vertex`, else `[1.0]` tagged `constant`.
    pub fn build_widths(&self, path: &PrimPath, time: TimeCode) -> (Vec<f32>, Interpolation) {
        self.widths_at(path, time, self.is_varying(path, DirtyBits::WIDTHS))
    }

    fn widths_at(&self, path: &PrimPath, time: TimeCode, varying: bool) -> (Vec<f32>, Interpolation) {
        match self.fetch_with(path, attr::WIDTHS, time, varying) {
            Fetched::Animated(widths) | Fetched::Static(widths) => (widths, Interpolation::Vertex),
            Fetched::Absent => (vec![DEFAULT_WIDTH], Interpolation::Constant),
        }
    }

    /// Authored normals tagged `vertex`; `None` if absent at `time`.
    pub fn build_normals(&self, path: &PrimPath, time: TimeCode) -> Option<(Vec<Vec3>, Interpolation)> {
        self.normals_at(path, time, self.is_varying(path, DirtyBits::NORMALS))
    }

    fn normals_at(
        &self,
        path: &PrimPath,
        time: TimeCode,
        varying: bool,
    ) -> Option<(Vec<Vec3>, Interpolation)> {
        self.fetch_with(path, attr::NORMALS, time, varying)
            .value()
            .map(|normals| (normals, Interpolation::Vertex))
    }

    /// World transform: product of every ancestor's local transform, root
    /// first. Unauthored locals are identity.
    pub fn build_transform(&self, path: &PrimPath, time: TimeCode) -> Mat4 {
        path.ancestors().iter().rev().fold(Mat4::IDENTITY, |world, p| {
            let local = read_as::<Mat4>(&self.reader, p, attr::TRANSFORM, time).unwrap_or(Mat4::IDENTITY);
            world * local
        })
    }

    /// False iff the prim or an ancestor is `invisible` at `time`.
    pub fn build_visibility(&self, path: &PrimPath, time: TimeCode) -> bool {
        for p in path.ancestors() {
            let Some(token) = read_as::<String>(&self.reader, &p, attr::VISIBILITY, time) else {
                continue;
            };
            match token.as_str() {
                VISIBILITY_INVISIBLE => return false,
                VISIBILITY_INHERITED => {}
                other => error!(prim = %p, "Unknown visibility '{}'", other),
            }
        }
        true
    }

    /// Display color and its interpolation, or the configured fallback color
    /// tagged `constant`.
    pub fn build_display_color(&self, path: &PrimPath, time: TimeCode) -> (Vec<Vec3>, Interpolation) {
        self.display_color_at(path, time, self.is_varying(path, DirtyBits::PRIMVAR))
    }

    fn display_color_at(
        &self,
        path: &PrimPath,
        time: TimeCode,
        varying: bool,
    ) -> (Vec<Vec3>, Interpolation) {
        match self.fetch_with::<Vec<Vec3>>(path, attr::DISPLAY_COLOR, time, varying).value() {
            Some(colors) => (colors, self.display_color_interpolation(path)),
            None => (
                vec![Vec3::from_array(self.settings.fallback_display_color)],
                Interpolation::Constant,
            ),
        }
    }

    fn display_color_interpolation(&self, path: &PrimPath) -> Interpolation {
        let Some(token) = read_as::<String>(
            &self.reader,
            path,
            attr::DISPLAY_COLOR_INTERPOLATION,
            TimeCode::Default,
        ) else {
            return Interpolation::Constant;
        };
        Interpolation::parse(&token).unwrap_or_else(|| {
            error!(prim = %path, "Unknown interpolation '{}' on displayColor", token);
            Interpolation::Constant
        })
    }

    fn shader_binding(&self, path: &PrimPath) -> ShaderBinding {
        let material = read_as::<String>(&self.reader, path, attr::MATERIAL_BINDING, TimeCode::Default)
            .and_then(|target| match PrimPath::new(&target) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(prim = %path, "ignoring material binding: {}", err);
                    None
                }
            });
        ShaderBinding::new(material)
    }

    // ------------------------------------------------------------------
    // Channel updates. Each returns whether the slot is valid afterwards.
    // ------------------------------------------------------------------

    fn update_channel(
        &self,
        channel: DirtyBits,
        path: &PrimPath,
        time: TimeCode,
        varying: bool,
        uniform: &mut Option<UniformCurveFields>,
        entry: &mut CacheEntry,
    ) -> bool {
        if channel == DirtyBits::POINTS {
            *entry.points_mut() = self.points_at(path, time, varying);
            entry
                .primvars
                .merge(PrimvarDescriptor::new(POINTS_PRIMVAR, Interpolation::Vertex));
            true
        } else if channel == DirtyBits::TOPOLOGY {
            let fields = *uniform.get_or_insert_with(|| self.read_uniform_fields(path));
            *entry.topology_mut() = self.topology_from(path, fields, time, varying);
            true
        } else if channel == DirtyBits::WIDTHS {
            let (widths, interpolation) = self.widths_at(path, time, varying);
            *entry.widths_mut() = widths;
            entry
                .primvars
                .merge(PrimvarDescriptor::new(WIDTHS_PRIMVAR, interpolation));
            true
        } else if channel == DirtyBits::NORMALS {
            match self.normals_at(path, time, varying) {
                Some((normals, interpolation)) => {
                    *entry.normals_mut() = normals;
                    entry
                        .primvars
                        .merge(PrimvarDescriptor::new(NORMALS_PRIMVAR, interpolation));
                    true
                }
                None => {
                    trace!(prim = %path, %time, "no normals");
                    entry.normals = None;
                    entry.primvars.remove(NORMALS_PRIMVAR);
                    false
                }
            }
        } else if channel == DirtyBits::TRANSFORM {
            *entry.transform_mut() = self.build_transform(path, time);
            true
        } else if channel == DirtyBits::VISIBILITY {
            *entry.visible_mut() = self.build_visibility(path, time);
            true
        } else if channel == DirtyBits::PRIMVAR {
            let (colors, interpolation) = self.display_color_at(path, time, varying);
            *entry.display_color_mut() = colors;
            entry
                .primvars
                .merge(PrimvarDescriptor::new(DISPLAY_COLOR_PRIMVAR, interpolation));
            true
        } else {
            // Not a curves channel: left to other adapters.
            true
        }
    }
}

impl<R: AttributeReader> PrimAdapter for BasisCurvesAdapter<R> {
    fn populate(&self, path: &PrimPath, index: &dyn RenderIndex) -> Option<PrimPath> {
        let _span = tracing::debug_span!("populate", prim = %path).entered();
        if !Self::is_supported(index) {
            error!(prim = %path, "render index does not support {}", RprimType::BasisCurves);
            return None;
        }
        let binding = self.shader_binding(path);
        index.insert_rprim(RprimType::BasisCurves, path, &binding);
        self.states.get_or_default(path);
        Some(path.clone())
    }

    fn prepare_variability(&self, path: &PrimPath, requested: DirtyBits) {
        trace!(prim = %path, ?requested, "prepare variability");
        self.states.get_or_default(path);
    }

    fn probe_variability(&self, path: &PrimPath, requested: DirtyBits) -> DirtyBits {
        let _span = tracing::debug_span!("probe_variability", prim = %path).entered();
        let state = self.states.get_or_default(path);
        let mut state = state.lock();

        let pending = (requested & DirtyBits::ALL_CURVES) - state.probed;
        for spec in CURVES_PROBES.iter().filter(|s| pending.contains(s.channel)) {
            let record = probe(&self.reader, path, spec);
            if record.varying {
                state.varying |= spec.channel;
            }
            state.records.push(record);
        }
        state.probed |= pending;
        if state.phase == Phase::Uninitialized {
            state.phase = Phase::VariabilityProbed;
        }

        state.varying & requested
    }

    fn prepare_frame(&self, path: &PrimPath, cache_path: &PrimPath, time: TimeCode, requested: DirtyBits) {
        trace!(prim = %path, cache = %cache_path, %time, ?requested, "prepare frame");
        self.cache
            .with_entry(cache_path, |entry| entry.prepare(requested & DirtyBits::ALL_CURVES));
    }

    fn update_frame(
        &self,
        path: &PrimPath,
        cache_path: &PrimPath,
        time: TimeCode,
        requested: DirtyBits,
    ) -> DirtyBits {
        let _span = tracing::debug_span!("update_frame", prim = %path, cache = %cache_path, %time).entered();

        let state = self.states.get_or_default(path);
        let (probed, known_static, static_absent, mut uniform) = {
            let mut s = state.lock();
            s.in_flight += 1;
            s.phase = Phase::Updating;
            (!s.probed.is_empty(), s.known_static(), s.static_absent, s.uniform)
        };
        if !probed {
            debug!(prim = %path, "update before variability probe, treating channels as varying");
        }

        let reuse = self.settings.reuse_static_channels;
        let mut cleared = DirtyBits::empty();
        let mut newly_absent = DirtyBits::empty();
        {
            let entry = self.cache.entry(cache_path);
            let mut entry = entry.lock();
            for channel in (requested & DirtyBits::ALL_CURVES).channels() {
                let is_static = known_static.contains(channel);
                if is_static && reuse {
                    if entry.valid.contains(channel) {
                        trace!(prim = %path, ?channel, "static channel already cached");
                        continue;
                    }
                    if static_absent.contains(channel) {
                        trace!(prim = %path, ?channel, "static channel known absent");
                        cleared |= channel;
                        continue;
                    }
                }
                let valid = self.update_channel(channel, path, time, !is_static, &mut uniform, &mut entry);
                entry.valid.set(channel, valid);
                if !valid {
                    cleared |= channel;
                    if is_static {
                        newly_absent |= channel;
                    }
                }
            }
        }

        {
            let mut s = state.lock();
            s.in_flight -= 1;
            if s.in_flight == 0 {
                s.phase = if s.probed.is_empty() {
                    Phase::Uninitialized
                } else {
                    Phase::VariabilityProbed
                };
            }
            s.static_absent |= newly_absent;
            if s.uniform.is_none() {
                s.uniform = uniform;
            }
        }

        requested - cleared
    }
}
