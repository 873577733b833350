use crate::analysis::domain::analysis_error::AnalysisError;
use crate::analysis::domain::face_analyzer::FaceAnalysis;
use crate::shared::face_box::FaceBox;

/// Analysis outcome for one detected face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    /// The rectangle as the detector reported it, before clamping.
    pub face: FaceBox,
    pub outcome: Result<FaceAnalysis, AnalysisError>,
}

/// Every face of one frame, in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: usize,
    pub faces: Vec<FaceReport>,
}

impl FrameReport {
    pub fn classified(&self) -> impl Iterator<Item = (&FaceBox, &FaceAnalysis)> {
        self.faces
            .iter()
            .filter_map(|f| f.outcome.as_ref().ok().map(|a| (&f.face, a)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&FaceBox, &AnalysisError)> {
        self.faces
            .iter()
            .filter_map(|f| f.outcome.as_ref().err().map(|e| (&f.face, e)))
    }
}
