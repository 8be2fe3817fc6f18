use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::HistogramSpec;
use crate::data::filter::DEFAULT_SUGGESTION_LIMIT;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "POKEDEX_VIZ_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "pokedex-viz.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Chart behaviour switches. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub histogram_bin_width: u32,
    pub histogram_floor: u32,
    pub suggestion_limit: usize,
    /// Added to the largest plotted stat to get the radar's outer ring.
    pub radar_padding: u32,
    /// Compare two creatures on the radar instead of one.
    pub dual_radar: bool,
    pub show_type_filters: bool,
    /// Recompute parallel-coordinate axis extents from the visible records
    /// instead of the whole dataset.
    pub extents_follow_filter: bool,
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            histogram_bin_width: 100,
            histogram_floor: 200,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            radar_padding: 5,
            dual_radar: true,
            show_type_filters: true,
            extents_follow_filter: false,
            window_size: [1200.0, 800.0],
        }
    }
}

impl ViewerConfig {
    pub fn histogram_spec(&self) -> HistogramSpec {
        HistogramSpec {
            bin_width: self.histogram_bin_width,
            floor: self.histogram_floor,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing viewer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Resolve the config file: `$POKEDEX_VIZ_CONFIG`, then
    /// `./pokedex-viz.json`, then built-in defaults.
    pub fn discover() -> Result<Self> {
        let candidate = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            });

        match candidate {
            Some(path) => {
                log::info!("Using config {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
