//! Curve enumeration remapping.
//!
//! Scene description spells curve basis, type and wrap as tokens
//! (`bspline`, `catmullRom`, ...). The render side has its own spelling
//! (`bSpline`, ...). Each domain is a closed set; a token outside it is an
//! authoring error and maps to the domain's `Unset` value.

use std::fmt;

use crate::util::{Error, Result};

/// Scene-description attribute names for the uniform curve fields.
pub const BASIS_ATTR: &str = "basis";
pub const TYPE_ATTR: &str = "type";
pub const WRAP_ATTR: &str = "wrap";

/// Which enumeration a token belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemapDomain {
    Basis,
    Type,
    Wrap,
}

impl RemapDomain {
    /// Domain name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basis => "basis",
            Self::Type => "type",
            Self::Wrap => "wrap",
        }
    }

    /// Attribute that holds this domain's token.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Basis => BASIS_ATTR,
            Self::Type => TYPE_ATTR,
            Self::Wrap => WRAP_ATTR,
        }
    }
}

impl fmt::Display for RemapDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curve basis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveBasis {
    /// Unset, the result of a failed remap
    #[default]
    Unset,
    Bezier,
    BSpline,
    CatmullRom,
}

impl CurveBasis {
    /// Map a scene-description token.
    pub fn from_scene_token(token: &str) -> Result<Self> {
        match token {
            "bezier" => Ok(Self::Bezier),
            "bspline" => Ok(Self::BSpline),
            "catmullRom" => Ok(Self::CatmullRom),
            _ => Err(unknown(RemapDomain::Basis, token)),
        }
    }

    /// Render-side token (empty when unset).
    pub fn render_token(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Bezier => "bezier",
            Self::BSpline => "bSpline",
            Self::CatmullRom => "catmullRom",
        }
    }
}

/// Curve degree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveType {
    /// Unset, the result of a failed remap
    #[default]
    Unset,
    Linear,
    Cubic,
}

impl CurveType {
    /// Map a scene-description token.
    pub fn from_scene_token(token: &str) -> Result<Self> {
        match token {
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            _ => Err(unknown(RemapDomain::Type, token)),
        }
    }

    /// Render-side token (empty when unset).
    pub fn render_token(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
        }
    }
}

/// Curve wrap mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveWrap {
    /// Unset, the result of a failed remap
    #[default]
    Unset,
    Periodic,
    NonPeriodic,
}

impl CurveWrap {
    /// Map a scene-description token.
    pub fn from_scene_token(token: &str) -> Result<Self> {
        match token {
            "periodic" => Ok(Self::Periodic),
            "nonperiodic" => Ok(Self::NonPeriodic),
            _ => Err(unknown(RemapDomain::Wrap, token)),
        }
    }

    /// Render-side token (empty when unset).
    pub fn render_token(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Periodic => "periodic",
            Self::NonPeriodic => "nonperiodic",
        }
    }
}

macro_rules! impl_display_render_token {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.render_token())
            }
        })*
    };
}

impl_display_render_token!(CurveBasis, CurveType, CurveWrap);

fn unknown(domain: RemapDomain, token: &str) -> Error {
    Error::UnknownToken {
        domain: domain.as_str(),
        token: token.to_string(),
    }
}

/// Remap a scene token in `domain` to its render token.
pub fn remap(domain: RemapDomain, token: &str) -> Result<&'static str> {
    match domain {
        RemapDomain::Basis => CurveBasis::from_scene_token(token).map(|b| b.render_token()),
        RemapDomain::Type => CurveType::from_scene_token(token).map(|t| t.render_token()),
        RemapDomain::Wrap => CurveWrap::from_scene_token(token).map(|w| w.render_token()),
    }
}

/// Remap and report: on a miss, log the authoring error and return the
/// domain's unset value. Never fails.
pub(crate) fn remap_or_report<T: Default>(
    path: &crate::core::PrimPath,
    result: Result<T>,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(prim = %path, "{}", err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_table() {
        assert_eq!(remap(RemapDomain::Basis, "bezier").unwrap(), "bezier");
        assert_eq!(remap(RemapDomain::Basis, "bspline").unwrap(), "bSpline");
        assert_eq!(remap(RemapDomain::Basis, "catmullRom").unwrap(), "catmullRom");
    }

    #[test]
    fn test_type_and_wrap_tables() {
        assert_eq!(remap(RemapDomain::Type, "linear").unwrap(), "linear");
        assert_eq!(remap(RemapDomain::Type, "cubic").unwrap(), "cubic");
        assert_eq!(remap(RemapDomain::Wrap, "periodic").unwrap(), "periodic");
        assert_eq!(remap(RemapDomain::Wrap, "nonperiodic").unwrap(), "nonperiodic");
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        // Render spellings are not scene tokens.
        assert!(remap(RemapDomain::Basis, "bSpline").is_err());
        assert!(remap(RemapDomain::Basis, "hermite").is_err());
        assert!(remap(RemapDomain::Type, "").is_err());
        let err = remap(RemapDomain::Wrap, "pinned").unwrap_err();
        assert!(matches!(err, Error::UnknownToken { domain: "wrap", .. }));
    }

    #[test]
    fn test_report_falls_back_to_unset() {
        let path = crate::core::PrimPath::new("/bad").unwrap();
        let basis = remap_or_report(&path, CurveBasis::from_scene_token("power"));
        assert_eq!(basis, CurveBasis::Unset);
        assert_eq!(basis.render_token(), "");
    }
}
