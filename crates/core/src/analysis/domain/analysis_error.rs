use thiserror::Error;

/// Per-face analysis failure. Never escalates past the face it belongs to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no valid regions: every region was clipped away")]
    NoValidRegions,
}

/// Rejected analysis configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("canonical size must be positive, got {width}x{height}")]
    ZeroCanonicalSize { width: u32, height: u32 },

    #[error("at least one region is required")]
    NoRegions,

    #[error("region {region}: half-extent must be non-negative, got ({w}, {h})")]
    NegativeHalfExtent { region: String, w: i32, h: i32 },

    #[error("region {region}: low threshold {low} exceeds high threshold {high}")]
    InvertedThresholds { region: String, low: f32, high: f32 },

    #[error("region {region}: thresholds must be non-negative and finite")]
    InvalidThreshold { region: String },

    #[error("middle-aged cutoff {middle} exceeds elderly cutoff {elderly}")]
    InvertedCutoffs { middle: f64, elderly: f64 },

    #[error("cutoffs must be finite")]
    NonFiniteCutoff,
}
