use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::cluster::cluster_regions;
use super::connected::connected_components;
use super::gradient::gradient_field;
use super::image::GrayView;
use super::mask::candidate_mask;
use crate::config::DetectorConfig;
use crate::error::{ConfigError, DetectError};
use crate::region::Region;

/// A barcode region detector with a validated configuration.
///
/// The detector holds no per-call state, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Create a detector, rejecting any configuration value outside its domain.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Find barcode-like regions in a grayscale image.
    ///
    /// Regions are disjoint and ordered by the row-major position of the
    /// first block that contributed to each.
    pub fn detect(&self, img: &GrayView) -> Vec<Region> {
        // Only a raised cancel flag can fail a run.
        self.run(img, None).unwrap_or_default()
    }

    /// Like [`Detector::detect`], aborting with [`DetectError::Cancelled`]
    /// once `cancel` is raised. The flag is polled once per block row.
    pub fn detect_with_cancel(
        &self,
        img: &GrayView,
        cancel: &AtomicBool,
    ) -> Result<Vec<Region>, DetectError> {
        self.run(img, Some(cancel))
    }

    fn run(&self, img: &GrayView, cancel: Option<&AtomicBool>) -> Result<Vec<Region>, DetectError> {
        let config = &self.config;

        // Stage 1: Gradient field
        let field = gradient_field(img, &config.gradient_params(), cancel)
            .ok_or(DetectError::Cancelled)?;
        debug!(
            cols = field.cols,
            rows = field.rows,
            "gradient field for {}x{} image",
            img.width(),
            img.height()
        );

        // Stage 2: Candidate mask
        let mask = candidate_mask(&field, config.gradient_threshold);
        debug!(candidates = mask.count(), "candidate mask built");

        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(DetectError::Cancelled);
        }

        // Stage 3: Connected components
        let components = connected_components(&mask);

        // Stage 4: Merge and filter
        let regions = cluster_regions(
            &mask,
            &components,
            img.width(),
            img.height(),
            &config.cluster_params(),
        );
        debug!(
            components = components.len(),
            regions = regions.len(),
            "clustering done"
        );

        Ok(regions)
    }
}

/// Detect barcode regions in a raw row-major grayscale buffer in one call.
pub fn detect_barcode_regions(
    buf: &[u8],
    width: u32,
    height: u32,
    config: &DetectorConfig,
) -> Result<Vec<Region>, crate::Error> {
    let detector = Detector::new(config.clone())?;
    let img = GrayView::new(width, height, buf)?;
    Ok(detector.detect(&img))
}
