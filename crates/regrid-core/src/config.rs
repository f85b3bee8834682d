//! Pipeline configuration.
//!
//! One [`RegridConfig`] drives every stage. It deserializes from JSON (or,
//! in the wasm crate, from a JS object); every section is optional and
//! unknown keys are rejected. [`RegridConfig::validate`] performs all range
//! checks up front so that no image work starts with a bad option.
//!
//! ```json
//! {
//!   "denoise": { "filter_kind": "high-pass", "kernel_size": 3 },
//!   "grid": { "max_cell_size": 32 },
//!   "palette": { "max_colors": 8, "algorithm": "median-cut" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorMetric;
use crate::error::{RegridError, Stage};

/// Largest supported palette.
pub const MAX_PALETTE_COLORS: usize = 256;

/// Largest supported denoise window side.
pub const MAX_KERNEL_SIZE: u32 = 15;

/// Largest supported output upscale factor.
pub const MAX_OUTPUT_SCALE: u32 = 64;

/// Complete restoration configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegridConfig {
    pub denoise: DenoiseConfig,
    pub grid: GridConfig,
    pub sample: SampleConfig,
    pub palette: PaletteConfig,
    pub output: OutputConfig,
}

/// Noise filter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Edge-preserving smoothing (sigma filter).
    #[default]
    LowPass,
    /// Edge snapping (majority filter).
    HighPass,
    /// Frequency-domain band selection.
    BandPass,
}

/// Denoiser options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DenoiseConfig {
    pub enabled: bool,
    pub filter_kind: FilterKind,
    /// Window side in pixels.
    pub kernel_size: u32,
    /// Similarity threshold (spatial filters) or coefficient threshold
    /// (band-pass), as a fraction of full scale.
    pub strength: f64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter_kind: FilterKind::LowPass,
            kernel_size: 3,
            strength: 0.12,
        }
    }
}

/// Grid period search method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridMethod {
    /// Per-axis spectral peak search on edge profiles.
    #[default]
    Spectral,
    /// Isotropic downscale/upscale reconstruction error search.
    Reconstruction,
}

/// Grid estimator options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub method: GridMethod,
    /// Relative slack when choosing between near-equal candidates.
    pub tolerance: f64,
    /// Largest cell edge considered, in pixels.
    pub max_cell_size: u32,
    /// Required peak-to-noise ratio.
    pub min_prominence: f64,
    pub rank_check: bool,
    /// Singular values below this fraction of the largest are ignored.
    pub rank_tolerance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            method: GridMethod::Spectral,
            tolerance: 0.1,
            max_cell_size: 64,
            min_prominence: 4.0,
            rank_check: true,
            rank_tolerance: 0.05,
        }
    }
}

/// Per-cell color reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleStrategy {
    #[default]
    Mean,
    Median,
    Mode,
    Stochastic,
}

/// Reducer applied to stochastic draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StochasticReducer {
    #[default]
    Median,
    Mode,
}

/// Treatment of pixels past the last whole cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Drop remainder pixels.
    #[default]
    Crop,
    /// Emit partial edge cells.
    Partial,
}

/// Sampler options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    pub strategy: SampleStrategy,
    pub seed: u64,
    pub samples_per_cell: u32,
    pub stochastic_reducer: StochasticReducer,
    pub edge_policy: EdgePolicy,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            strategy: SampleStrategy::Mean,
            seed: 0,
            samples_per_cell: 9,
            stochastic_reducer: StochasticReducer::Median,
            edge_policy: EdgePolicy::Crop,
        }
    }
}

/// Palette construction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteAlgorithm {
    #[default]
    KMeans,
    MedianCut,
}

/// Palette quantizer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub max_colors: usize,
    /// Minimum distance between any two final entries.
    pub min_distance: f64,
    pub algorithm: PaletteAlgorithm,
    pub metric: ColorMetric,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            max_colors: 16,
            min_distance: 6.0,
            algorithm: PaletteAlgorithm::KMeans,
            metric: ColorMetric::Lab,
        }
    }
}

/// Writer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Nearest-neighbour upscale factor applied when encoding.
    pub scale: u32,
    /// Make the background region reachable from the corners transparent.
    pub transparent_background: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            transparent_background: false,
        }
    }
}

impl RegridConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, RegridError> {
        let config: RegridConfig = serde_json::from_str(json)
            .map_err(|e| RegridError::invalid_config(Stage::Config, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegridError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            RegridError::invalid_config(
                Stage::Config,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&data)
    }

    /// Check every option range. The first violation is reported.
    pub fn validate(&self) -> Result<(), RegridError> {
        self.denoise.validate()?;
        self.grid.validate()?;
        self.sample.validate()?;
        self.palette.validate()?;
        self.output.validate()
    }
}

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl DenoiseConfig {
    pub fn validate(&self) -> Result<(), RegridError> {
        if self.kernel_size == 0 || self.kernel_size > MAX_KERNEL_SIZE {
            return Err(RegridError::invalid_config(
                Stage::Denoise,
                format!(
                    "kernel_size {} outside [1, {}]",
                    self.kernel_size, MAX_KERNEL_SIZE
                ),
            ));
        }
        if !in_unit_range(self.strength) {
            return Err(RegridError::invalid_config(
                Stage::Denoise,
                format!("strength {} outside [0, 1]", self.strength),
            ));
        }
        Ok(())
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), RegridError> {
        if !in_unit_range(self.tolerance) {
            return Err(RegridError::invalid_config(
                Stage::Grid,
                format!("tolerance {} outside [0, 1]", self.tolerance),
            ));
        }
        if self.max_cell_size < 2 {
            return Err(RegridError::invalid_config(
                Stage::Grid,
                format!("max_cell_size {} must be at least 2", self.max_cell_size),
            ));
        }
        if !(self.min_prominence >= 1.0 && self.min_prominence.is_finite()) {
            return Err(RegridError::invalid_config(
                Stage::Grid,
                format!("min_prominence {} must be a finite value >= 1", self.min_prominence),
            ));
        }
        if !(self.rank_tolerance > 0.0 && self.rank_tolerance < 1.0) {
            return Err(RegridError::invalid_config(
                Stage::Grid,
                format!("rank_tolerance {} outside (0, 1)", self.rank_tolerance),
            ));
        }
        Ok(())
    }
}

impl SampleConfig {
    pub fn validate(&self) -> Result<(), RegridError> {
        if self.samples_per_cell == 0 {
            return Err(RegridError::invalid_config(
                Stage::Sample,
                "samples_per_cell must be at least 1",
            ));
        }
        Ok(())
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), RegridError> {
        if self.max_colors == 0 || self.max_colors > MAX_PALETTE_COLORS {
            return Err(RegridError::invalid_config(
                Stage::Palette,
                format!(
                    "max_colors {} outside [1, {}]",
                    self.max_colors, MAX_PALETTE_COLORS
                ),
            ));
        }
        if !(self.min_distance >= 0.0 && self.min_distance.is_finite()) {
            return Err(RegridError::invalid_config(
                Stage::Palette,
                format!("min_distance {} must be a finite value >= 0", self.min_distance),
            ));
        }
        Ok(())
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), RegridError> {
        if self.scale == 0 || self.scale > MAX_OUTPUT_SCALE {
            return Err(RegridError::invalid_config(
                Stage::Encode,
                format!("scale {} outside [1, {}]", self.scale, MAX_OUTPUT_SCALE),
            ));
        }
        Ok(())
    }
}
