pub mod image;
pub mod gradient;
pub mod mask;
pub mod unionfind;
pub mod connected;
pub mod cluster;
pub mod detector;

pub use detector::{detect_barcode_regions, Detector};
pub use image::GrayView;
