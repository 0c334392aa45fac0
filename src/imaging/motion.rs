//! Motion sample ordering.
//!
//! Motion blur is *backward* when more than one sample is requested and the
//! first offset lies after the last one. Attribute reads are still issued in
//! ascending time order; only the interpretation flips.

use crate::core::TimeCode;

/// True iff there are at least two offsets and the first is strictly
/// greater than the last.
pub fn is_backward(sample_times: &[f64]) -> bool {
    match (sample_times.first(), sample_times.last()) {
        (Some(first), Some(last)) if sample_times.len() > 1 => first > last,
        _ => false,
    }
}

/// Requested motion sample offsets, relative to the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionSamples {
    offsets: Vec<f64>,
}

impl MotionSamples {
    pub fn new(offsets: impl Into<Vec<f64>>) -> Self {
        Self {
            offsets: offsets.into(),
        }
    }

    /// Offsets as requested.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn is_backward(&self) -> bool {
        is_backward(&self.offsets)
    }

    /// Absolute read times around `frame`, in ascending order.
    pub fn times_at(&self, frame: f64) -> Vec<TimeCode> {
        let mut times: Vec<f64> = self.offsets.iter().map(|o| frame + o).collect();
        if self.is_backward() {
            times.reverse();
        }
        times.into_iter().map(TimeCode::Time).collect()
    }
}

impl Default for MotionSamples {
    /// A single sample on the frame itself.
    fn default() -> Self {
        Self::new(vec![0.0])
    }
}
