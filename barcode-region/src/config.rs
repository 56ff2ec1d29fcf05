#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detect::gradient::MAX_SCORE;
use crate::error::ConfigError;

/// Gradient scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientParams {
    pub block_size: u32,
    pub scanlines_per_block: u32,
    pub binarize_level: Option<u8>,
    pub vertical_weight: f32,
}

/// Clustering, merge, and filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub block_size: u32,
    pub merge_margin: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub min_density: f32,
    pub min_run_blocks: u32,
}

/// Detector configuration.
///
/// Every field is a tunable. Lighting and print contrast vary a lot between
/// photographs, so `gradient_threshold` is the first knob to reach for.
///
/// The defaults resolve bars up to 7 px wide: a 16 px block then always holds
/// at least two transitions. Wider bars can leave a block with a single edge
/// (score 17), so raise `block_size` or lower `gradient_threshold` for them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DetectorConfig {
    /// Side of the square scoring tile in pixels.
    pub block_size: u32,
    /// Number of rows sampled inside each block.
    pub scanlines_per_block: u32,
    /// Map samples to 0/255 at this level before differencing.
    pub binarize_level: Option<u8>,
    /// Weight of the vertical difference subtracted from the horizontal energy.
    /// `0.0` scores plain horizontal edge energy.
    pub vertical_weight: f32,
    /// A block is a candidate when its score is strictly above this value.
    pub gradient_threshold: f32,
    /// Pixel margin within which nearby boxes are merged.
    pub merge_margin: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Lower bound on width / height.
    pub min_aspect: f32,
    /// Upper bound on width / height.
    pub max_aspect: f32,
    /// Minimum fraction of candidate blocks inside a kept box.
    pub min_density: f32,
    /// Minimum horizontal run of consecutive candidate blocks in a kept box.
    pub min_run_blocks: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            block_size: 16,
            scanlines_per_block: 8,
            binarize_level: None,
            vertical_weight: 1.0,
            gradient_threshold: 30.0,
            merge_margin: 8,
            min_width: 32,
            min_height: 16,
            min_aspect: 0.5,
            max_aspect: 25.0,
            min_density: 0.5,
            min_run_blocks: 2,
        }
    }
}

impl DetectorConfig {
    /// Check every field against its valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.scanlines_per_block == 0 {
            return Err(ConfigError::ZeroScanlines);
        }
        let t = self.gradient_threshold;
        if !t.is_finite() || t < 0.0 || t >= MAX_SCORE {
            return Err(ConfigError::InvalidThreshold(t));
        }
        let vw = self.vertical_weight;
        if !vw.is_finite() || vw < 0.0 {
            return Err(ConfigError::InvalidVerticalWeight(vw));
        }
        if self.min_width == 0 || self.min_height == 0 {
            return Err(ConfigError::ZeroMinSize);
        }
        for a in [self.min_aspect, self.max_aspect] {
            if !a.is_finite() || a <= 0.0 {
                return Err(ConfigError::InvalidAspect(a));
            }
        }
        if self.min_aspect > self.max_aspect {
            return Err(ConfigError::AspectRange {
                min: self.min_aspect,
                max: self.max_aspect,
            });
        }
        let d = self.min_density;
        if !d.is_finite() || !(0.0..=1.0).contains(&d) {
            return Err(ConfigError::InvalidDensity(d));
        }
        if self.min_run_blocks == 0 {
            return Err(ConfigError::ZeroMinRun);
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: DetectorConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn gradient_params(&self) -> GradientParams {
        GradientParams {
            block_size: self.block_size,
            scanlines_per_block: self.scanlines_per_block,
            binarize_level: self.binarize_level,
            vertical_weight: self.vertical_weight,
        }
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            block_size: self.block_size,
            merge_margin: self.merge_margin,
            min_width: self.min_width,
            min_height: self.min_height,
            min_aspect: self.min_aspect,
            max_aspect: self.max_aspect,
            min_density: self.min_density,
            min_run_blocks: self.min_run_blocks,
        }
    }
}
