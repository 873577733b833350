use crate::shared::frame::Frame;

use super::edge_map::EdgeMap;
use super::face_region::ThresholdPair;

/// Domain interface for the per-region edge operator.
///
/// Implementations are stateless so one instance can serve every worker.
pub trait EdgeDetector: Send + Sync {
    /// Produces an edge map with the same dimensions as `roi`.
    fn detect(&self, roi: &Frame, thresholds: ThresholdPair) -> EdgeMap;
}

/// Which edge operator scores the regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOperator {
    /// Sobel magnitude with double-threshold hysteresis, no smoothing or thinning.
    #[default]
    Hysteresis,
    /// Gaussian-smoothed, non-maximum-suppressed Canny.
    Canny,
}

impl std::fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeOperator::Hysteresis => write!(f, "hysteresis"),
            EdgeOperator::Canny => write!(f, "canny"),
        }
    }
}

impl std::str::FromStr for EdgeOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hysteresis" => Ok(EdgeOperator::Hysteresis),
            "canny" => Ok(EdgeOperator::Canny),
            other => Err(format!(
                "Edge operator must be 'hysteresis' or 'canny', got '{other}'"
            )),
        }
    }
}
