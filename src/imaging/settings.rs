//! Adapter settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::util::Result;

/// Tunables for [`super::BasisCurvesAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Display color used when `primvars:displayColor` is not authored.
    pub fallback_display_color: [f32; 3],
    /// Skip re-reading channels that were probed static and are already cached.
    pub reuse_static_channels: bool,
    /// Batches smaller than this are updated on the calling thread.
    pub parallel_threshold: usize,
    /// Log a warning when a prim has no readable points.
    pub warn_on_missing_points: bool,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            fallback_display_color: [0.5, 0.5, 0.5],
            reuse_static_channels: true,
            parallel_threshold: 64,
            warn_on_missing_points: true,
        }
    }
}

impl AdapterSettings {
    /// Parse settings from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
