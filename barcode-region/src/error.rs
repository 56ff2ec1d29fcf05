use thiserror::Error;

/// A detector configuration value outside its valid domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    #[error("scanlines per block must be at least 1")]
    ZeroScanlines,

    #[error("gradient threshold {0} must be finite and in [0, 255)")]
    InvalidThreshold(f32),

    #[error("vertical weight {0} must be finite and non-negative")]
    InvalidVerticalWeight(f32),

    #[error("minimum region width and height must be at least 1")]
    ZeroMinSize,

    #[error("aspect ratio bound {0} must be finite and positive")]
    InvalidAspect(f32),

    #[error("minimum aspect ratio {min} exceeds maximum aspect ratio {max}")]
    AspectRange { min: f32, max: f32 },

    #[error("minimum density {0} must be in [0, 1]")]
    InvalidDensity(f32),

    #[error("minimum run length must be at least 1 block")]
    ZeroMinRun,

    #[error("config parse error: {0}")]
    Parse(String),
}

/// A detection call that could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("invalid dimensions {width}x{height} for a buffer of {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("detection cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Detect(#[from] DetectError),
}
