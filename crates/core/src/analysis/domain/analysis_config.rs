use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_CANONICAL_SIZE;

use super::age_classifier::AgeCutoffs;
use super::analysis_error::ConfigError;
use super::edge_detector::EdgeOperator;
use super::face_region::{RegionTemplate, DEFAULT_REGION_TEMPLATES};

/// Tunables of the per-face analysis.
///
/// Missing fields in a JSON file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub canonical_width: u32,
    pub canonical_height: u32,
    pub regions: Vec<RegionTemplate>,
    pub cutoffs: AgeCutoffs,
    pub edge_operator: EdgeOperator,
    /// Keep an annotated copy of each canonical crop in the result.
    pub annotate: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            canonical_width: DEFAULT_CANONICAL_SIZE,
            canonical_height: DEFAULT_CANONICAL_SIZE,
            regions: DEFAULT_REGION_TEMPLATES.to_vec(),
            cutoffs: AgeCutoffs::default(),
            edge_operator: EdgeOperator::default(),
            annotate: false,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(ConfigError::ZeroCanonicalSize {
                width: self.canonical_width,
                height: self.canonical_height,
            });
        }
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        for region in &self.regions {
            region.validate()?;
        }
        self.cutoffs.validate()
    }
}
