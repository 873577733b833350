use crate::analysis::domain::analysis_error::AnalysisError;
use crate::analysis::domain::face_analyzer::{FaceAnalysis, FaceAnalyzer};
use crate::shared::frame::Frame;

pub type FaceOutcome = Result<FaceAnalysis, AnalysisError>;

/// Decides how the faces of one frame are spread over threads.
///
/// Outcomes are returned in the order of `crops`. An `Err` means the batch
/// itself failed (e.g. a worker panicked); per-face failures live inside
/// each `FaceOutcome`.
pub trait FaceAnalysisExecutor: Send + Sync {
    fn analyze_all(
        &self,
        analyzer: &FaceAnalyzer,
        crops: &[Frame],
    ) -> Result<Vec<FaceOutcome>, Box<dyn std::error::Error>>;
}

/// Analyses the faces one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialFaceExecutor;

impl FaceAnalysisExecutor for SequentialFaceExecutor {
    fn analyze_all(
        &self,
        analyzer: &FaceAnalyzer,
        crops: &[Frame],
    ) -> Result<Vec<FaceOutcome>, Box<dyn std::error::Error>> {
        Ok(crops.iter().map(|crop| analyzer.analyze_face(crop)).collect())
    }
}
