//! Sample addressing and primvar interpolation.
//!
//! Attributes are read at a [`TimeCode`]; primvars carry an
//! [`Interpolation`] that says how their values map onto curve elements.

use std::fmt;

/// Time at which an attribute is read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimeCode {
    /// The non-animated (default) value of an attribute.
    #[default]
    Default,
    /// A specific time, in frames.
    Time(f64),
}

impl TimeCode {
    /// Check if this is the default time code.
    #[inline]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Numeric time, or `fallback` for the default time code.
    #[inline]
    pub fn value_or(&self, fallback: f64) -> f64 {
        match self {
            Self::Default => fallback,
            Self::Time(t) => *t,
        }
    }
}

impl From<f64> for TimeCode {
    fn from(time: f64) -> Self {
        Self::Time(time)
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("DEFAULT"),
            Self::Time(t) => write!(f, "{}", t),
        }
    }
}

/// How a primvar's values are distributed over the curve topology.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// One value for the whole prim.
    #[default]
    Constant,
    /// One value per curve.
    Uniform,
    /// One value per segment end, linearly interpolated.
    Varying,
    /// One value per control vertex, interpolated with the curve basis.
    Vertex,
    /// One value per face-vertex.
    FaceVarying,
}

impl Interpolation {
    /// Parse a scene-description interpolation token.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(Self::Constant),
            "uniform" => Some(Self::Uniform),
            "varying" => Some(Self::Varying),
            "vertex" => Some(Self::Vertex),
            "faceVarying" => Some(Self::FaceVarying),
            _ => None,
        }
    }

    /// Token as written in scene description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Uniform => "uniform",
            Self::Varying => "varying",
            Self::Vertex => "vertex",
            Self::FaceVarying => "faceVarying",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
