//! Localize 1-D barcode regions in grayscale images.
//!
//! The pipeline scores fixed-size blocks by horizontal edge energy, thresholds
//! the scores into a candidate mask, then clusters candidate blocks into
//! disjoint, axis-aligned [`Region`]s.
//!
//! ```
//! use barcode_region::{Detector, DetectorConfig, GrayView};
//!
//! let pixels = vec![255u8; 320 * 240];
//! let img = GrayView::new(320, 240, &pixels).unwrap();
//! let detector = Detector::new(DetectorConfig::default()).unwrap();
//! assert!(detector.detect(&img).is_empty());
//! ```

pub mod error;
pub mod config;
pub mod region;
pub mod detect;

pub use config::DetectorConfig;
pub use detect::{detect_barcode_regions, Detector, GrayView};
pub use error::{ConfigError, DetectError, Error};
pub use region::Region;
