use crate::shared::frame::Frame;

use super::age_classifier::{AgeCategory, AgeClassifier};
use super::analysis_config::AnalysisConfig;
use super::analysis_error::{AnalysisError, ConfigError};
use super::edge_detector::EdgeDetector;
use super::edge_scorer::{annotate, EdgeResult, EdgeScorer};
use super::face_region::RegionLocator;
use super::normalizer::normalize;
use super::wrinkle_aggregator::aggregate;

/// Outcome of analysing one face crop.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnalysis {
    pub category: AgeCategory,
    /// Mean edge density over the surviving regions, in percent.
    pub score: f64,
    pub results: Vec<EdgeResult>,
    /// Canonical crop with region outlines and edge maps, when enabled.
    pub annotated: Option<Frame>,
}

/// Per-face pipeline: normalize, locate regions, score edges, aggregate,
/// classify.
///
/// Holds only immutable configuration, so one analyzer can be shared by
/// every worker.
pub struct FaceAnalyzer {
    canonical_width: u32,
    canonical_height: u32,
    locator: RegionLocator,
    scorer: EdgeScorer,
    classifier: AgeClassifier,
    annotate: bool,
}

impl FaceAnalyzer {
    pub fn new(
        config: &AnalysisConfig,
        detector: Box<dyn EdgeDetector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            canonical_width: config.canonical_width,
            canonical_height: config.canonical_height,
            locator: RegionLocator::new(config.regions.clone()),
            scorer: EdgeScorer::new(detector),
            classifier: AgeClassifier::new(config.cutoffs),
            annotate: config.annotate,
        })
    }

    pub fn analyze_face(&self, crop: &Frame) -> Result<FaceAnalysis, AnalysisError> {
        let canonical = normalize(crop, self.canonical_width, self.canonical_height)?;
        let regions = self
            .locator
            .locate(canonical.width(), canonical.height());
        let results = self.scorer.score(&canonical, &regions);
        let score = aggregate(&results)?;
        let category = self.classifier.classify(score);

        log::debug!(
            "Face {}x{}: {} of {} regions scored, wrinkle {:.3}% -> {}",
            crop.width(),
            crop.height(),
            results.len(),
            regions.len(),
            score,
            category
        );

        let annotated = if self.annotate {
            annotate(&canonical, &results)
        } else {
            None
        };

        Ok(FaceAnalysis {
            category,
            score,
            results,
            annotated,
        })
    }
}
