//! Render-ready basis curves topology.

use super::tokens::{CurveBasis, CurveType, CurveWrap};

/// Topology handed to the render engine for a basis curves prim.
///
/// Basis, type and wrap are uniform; only the vertex counts are sampled per
/// frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasisCurvesTopology {
    pub curve_type: CurveType,
    pub basis: CurveBasis,
    pub wrap: CurveWrap,
    /// Control vertices per curve.
    pub curve_vertex_counts: Vec<i32>,
    /// Optional per-curve index buffer. Always empty for authored curves.
    pub curve_indices: Vec<i32>,
}

impl BasisCurvesTopology {
    /// Create a topology with no curve indices.
    pub fn new(
        curve_type: CurveType,
        basis: CurveBasis,
        wrap: CurveWrap,
        curve_vertex_counts: Vec<i32>,
    ) -> Self {
        Self {
            curve_type,
            basis,
            wrap,
            curve_vertex_counts,
            curve_indices: Vec::new(),
        }
    }

    /// Number of curves.
    #[inline]
    pub fn num_curves(&self) -> usize {
        self.curve_vertex_counts.len()
    }

    /// Total control vertices over all curves. Negative counts contribute
    /// nothing.
    pub fn num_vertices(&self) -> usize {
        self.curve_vertex_counts
            .iter()
            .map(|&n| n.max(0) as usize)
            .sum()
    }

    /// Check if basis, type and wrap all remapped successfully.
    pub fn is_fully_specified(&self) -> bool {
        self.basis != CurveBasis::Unset
            && self.curve_type != CurveType::Unset
            && self.wrap != CurveWrap::Unset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let topo = BasisCurvesTopology::new(
            CurveType::Cubic,
            CurveBasis::Bezier,
            CurveWrap::NonPeriodic,
            vec![4, 7, -1],
        );
        assert_eq!(topo.num_curves(), 3);
        assert_eq!(topo.num_vertices(), 11);
        assert!(topo.curve_indices.is_empty());
        assert!(topo.is_fully_specified());
    }

    #[test]
    fn test_default_is_empty_and_unset() {
        let topo = BasisCurvesTopology::default();
        assert_eq!(topo.num_curves(), 0);
        assert!(!topo.is_fully_specified());
    }
}
