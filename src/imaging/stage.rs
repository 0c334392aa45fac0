//! In-memory attribute store.
//!
//! Each attribute has an optional default value and a list of time samples.
//! A time sample may be *blocked* (`None`), which makes the attribute read as
//! missing from that sample on. Reads between samples hold the earlier one;
//! reads before the first sample see the first one.

use std::collections::HashMap;

use crate::core::{PrimPath, TimeCode, Value};

use super::reader::AttributeReader;

#[derive(Clone, Debug, Default)]
struct AttributeData {
    default: Option<Value>,
    /// Sorted by time, unique times.
    samples: Vec<(f64, Option<Value>)>,
}

impl AttributeData {
    fn value_at(&self, time: TimeCode) -> Option<&Value> {
        match time {
            TimeCode::Default => self.default.as_ref(),
            TimeCode::Time(t) => {
                if self.samples.is_empty() {
                    return self.default.as_ref();
                }
                // Floor sample: largest time <= t, clamped to the first.
                let idx = self.samples.partition_point(|(st, _)| *st <= t);
                let idx = idx.saturating_sub(1);
                self.samples[idx].1.as_ref()
            }
        }
    }

    fn insert_sample(&mut self, time: f64, value: Option<Value>) {
        match self.samples.binary_search_by(|(st, _)| st.total_cmp(&time)) {
            Ok(idx) => self.samples[idx].1 = value,
            Err(idx) => self.samples.insert(idx, (time, value)),
        }
    }
}

/// Scene description held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStage {
    prims: HashMap<PrimPath, HashMap<String, AttributeData>>,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    fn attribute_mut(&mut self, path: &PrimPath, attribute: &str) -> &mut AttributeData {
        self.prims
            .entry(path.clone())
            .or_default()
            .entry(attribute.to_string())
            .or_default()
    }

    fn attribute(&self, path: &PrimPath, attribute: &str) -> Option<&AttributeData> {
        self.prims.get(path)?.get(attribute)
    }

    /// Author the default (non-animated) value.
    pub fn set_default(&mut self, path: &PrimPath, attribute: &str, value: impl Into<Value>) -> &mut Self {
        self.attribute_mut(path, attribute).default = Some(value.into());
        self
    }

    /// Author a time sample.
    pub fn set_sample(
        &mut self,
        path: &PrimPath,
        attribute: &str,
        time: f64,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.attribute_mut(path, attribute)
            .insert_sample(time, Some(value.into()));
        self
    }

    /// Author a blocked time sample: the attribute reads as missing there.
    pub fn block_sample(&mut self, path: &PrimPath, attribute: &str, time: f64) -> &mut Self {
        self.attribute_mut(path, attribute).insert_sample(time, None);
        self
    }

    /// Remove an attribute with all its opinions.
    pub fn clear_attribute(&mut self, path: &PrimPath, attribute: &str) -> &mut Self {
        if let Some(attrs) = self.prims.get_mut(path) {
            attrs.remove(attribute);
        }
        self
    }

    /// Check if any opinion exists for `attribute` on `path`.
    pub fn has_attribute(&self, path: &PrimPath, attribute: &str) -> bool {
        self.attribute(path, attribute).is_some()
    }

    /// Number of time samples authored on an attribute.
    pub fn num_samples(&self, path: &PrimPath, attribute: &str) -> usize {
        self.attribute(path, attribute)
            .map(|a| a.samples.len())
            .unwrap_or(0)
    }
}

impl AttributeReader for MemoryStage {
    fn read(&self, path: &PrimPath, attribute: &str, time: TimeCode) -> Option<Value> {
        self.attribute(path, attribute)?.value_at(time).cloned()
    }

    fn is_time_varying(&self, path: &PrimPath, attribute: &str) -> bool {
        self.num_samples(path, attribute) > 1
    }
}
