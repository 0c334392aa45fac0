//! Load-time variability probing.
//!
//! Once per scene load each tracked attribute is asked whether it varies
//! over time. The answer decides which dirty bits the host must request on
//! every frame; static channels are read once and then reused.

use std::fmt;

use crate::core::{DirtyBits, PrimPath};

use super::reader::{attr, AttributeReader};

/// Why a channel is time-varying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VaryingTag {
    PrimVar,
    Topology,
    Widths,
    Normals,
    Transform,
    Visibility,
}

impl VaryingTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimVar => "primvar varies",
            Self::Topology => "topology varies",
            Self::Widths => "widths vary",
            Self::Normals => "normals vary",
            Self::Transform => "transform varies",
            Self::Visibility => "visibility varies",
        }
    }
}

impl fmt::Display for VaryingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariabilityRecord {
    pub attribute: &'static str,
    pub channel: DirtyBits,
    pub varying: bool,
    pub tag: VaryingTag,
}

/// What to probe for a channel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProbeSpec {
    pub attribute: &'static str,
    pub channel: DirtyBits,
    pub tag: VaryingTag,
    /// Also varying if any ancestor's attribute varies.
    pub inherited: bool,
}

/// Channels the curves adapter probes. Basis, type and wrap are uniform and
/// never probed; topology variability comes from the vertex counts alone.
pub(crate) const CURVES_PROBES: &[ProbeSpec] = &[
    ProbeSpec {
        attribute: attr::POINTS,
        channel: DirtyBits::POINTS,
        tag: VaryingTag::PrimVar,
        inherited: false,
    },
    ProbeSpec {
        attribute: attr::CURVE_VERTEX_COUNTS,
        channel: DirtyBits::TOPOLOGY,
        tag: VaryingTag::Topology,
        inherited: false,
    },
    ProbeSpec {
        attribute: attr::WIDTHS,
        channel: DirtyBits::WIDTHS,
        tag: VaryingTag::Widths,
        inherited: false,
    },
    ProbeSpec {
        attribute: attr::NORMALS,
        channel: DirtyBits::NORMALS,
        tag: VaryingTag::Normals,
        inherited: false,
    },
    ProbeSpec {
        attribute: attr::TRANSFORM,
        channel: DirtyBits::TRANSFORM,
        tag: VaryingTag::Transform,
        inherited: true,
    },
    ProbeSpec {
        attribute: attr::VISIBILITY,
        channel: DirtyBits::VISIBILITY,
        tag: VaryingTag::Visibility,
        inherited: true,
    },
    ProbeSpec {
        attribute: attr::DISPLAY_COLOR,
        channel: DirtyBits::PRIMVAR,
        tag: VaryingTag::PrimVar,
        inherited: false,
    },
];

/// Ask the reader whether `spec.attribute` varies on `path` (or, for
/// inherited attributes, on any ancestor).
pub(crate) fn probe(reader: &dyn AttributeReader, path: &PrimPath, spec: &ProbeSpec) -> VariabilityRecord {
    let varying = if spec.inherited {
        path.ancestors()
            .iter()
            .any(|p| reader.is_time_varying(p, spec.attribute))
    } else {
        reader.is_time_varying(path, spec.attribute)
    };

    if varying {
        tracing::debug!(prim = %path, attribute = spec.attribute, "{}", spec.tag);
    }

    VariabilityRecord {
        attribute: spec.attribute,
        channel: spec.channel,
        varying,
        tag: spec.tag,
    }
}
