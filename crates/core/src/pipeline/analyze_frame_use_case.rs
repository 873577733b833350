use crate::analysis::domain::analysis_error::AnalysisError;
use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::face_analysis_executor::{FaceAnalysisExecutor, FaceOutcome};
use crate::reporting::domain::frame_report::{FaceReport, FrameReport};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// One frame: detect faces → crop each box → analyse the crops.
pub struct AnalyzeFrameUseCase {
    detector: Box<dyn FaceDetector>,
    analyzer: FaceAnalyzer,
    executor: Box<dyn FaceAnalysisExecutor>,
}

impl AnalyzeFrameUseCase {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        analyzer: FaceAnalyzer,
        executor: Box<dyn FaceAnalysisExecutor>,
    ) -> Self {
        Self {
            detector,
            analyzer,
            executor,
        }
    }

    pub fn execute(&mut self, frame: &Frame) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let faces = self.detect(frame)?;
        self.analyze(frame, faces)
    }

    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        self.detector.detect(frame)
    }

    /// Analyses `faces` of `frame`, keeping detection order.
    ///
    /// Boxes with nothing inside the frame fail with `InvalidInput` without
    /// reaching the executor.
    pub fn analyze(
        &self,
        frame: &Frame,
        faces: Vec<FaceBox>,
    ) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let mut crops = Vec::with_capacity(faces.len());
        let mut slots: Vec<Option<FaceOutcome>> = Vec::with_capacity(faces.len());
        for face in &faces {
            match face.clamp_to(frame.width(), frame.height()) {
                Some(rect) => {
                    crops.push(frame.crop(rect));
                    slots.push(None);
                }
                None => slots.push(Some(Err(AnalysisError::InvalidInput(format!(
                    "face box ({}, {}, {}x{}) has no area inside the {}x{} frame",
                    face.x,
                    face.y,
                    face.width,
                    face.height,
                    frame.width(),
                    frame.height()
                ))))),
            }
        }

        let mut analysed = self.executor.analyze_all(&self.analyzer, &crops)?.into_iter();
        let faces = faces
            .into_iter()
            .zip(slots)
            .map(|(face, slot)| -> Result<FaceReport, Box<dyn std::error::Error>> {
                let outcome = match slot {
                    Some(outcome) => outcome,
                    None => analysed
                        .next()
                        .ok_or("executor returned fewer outcomes than crops")?,
                };
                Ok(FaceReport { face, outcome })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FrameReport {
            frame_index: frame.index(),
            faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::age_classifier::AgeCategory;
    use crate::analysis::domain::analysis_config::AnalysisConfig;
    use crate::analysis::infrastructure::hysteresis_edge_detector::HysteresisEdgeDetector;
    use crate::pipeline::face_analysis_executor::SequentialFaceExecutor;
    use crate::pipeline::infrastructure::threaded_face_executor::ThreadedFaceExecutor;

    struct StubDetector {
        faces: Vec<FaceBox>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
            Ok(self.faces.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
            Err("camera unplugged".into())
        }
    }

    fn analyzer() -> FaceAnalyzer {
        FaceAnalyzer::new(
            &AnalysisConfig::default(),
            Box::new(HysteresisEdgeDetector::new()),
        )
        .unwrap()
    }

    /// 200x100 frame: left half flat gray, right half a 2px checkerboard.
    fn two_face_frame() -> Frame {
        let mut data = Vec::with_capacity(200 * 100 * 3);
        for y in 0..100u32 {
            for x in 0..200u32 {
                let v = if x < 100 {
                    120
                } else if ((x / 2) + (y / 2)) % 2 == 0 {
                    0
                } else {
                    255
                };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::new(data, 200, 100, 3, 4)
    }

    fn use_case(faces: Vec<FaceBox>, executor: Box<dyn FaceAnalysisExecutor>) -> AnalyzeFrameUseCase {
        AnalyzeFrameUseCase::new(Box::new(StubDetector { faces }), analyzer(), executor)
    }

    #[test]
    fn test_faces_reported_in_detection_order() {
        let faces = vec![
            FaceBox::new(100, 0, 100, 100),
            FaceBox::new(0, 0, 100, 100),
        ];
        let mut uc = use_case(faces.clone(), Box::new(SequentialFaceExecutor));
        let report = uc.execute(&two_face_frame()).unwrap();

        assert_eq!(report.frame_index, 4);
        let boxes: Vec<FaceBox> = report.faces.iter().map(|f| f.face).collect();
        assert_eq!(boxes, faces);
        let categories: Vec<AgeCategory> = report
            .classified()
            .map(|(_, analysis)| analysis.category)
            .collect();
        assert_eq!(categories, vec![AgeCategory::Elderly, AgeCategory::Young]);
    }

    #[test]
    fn test_box_outside_frame_fails_alone() {
        let faces = vec![
            FaceBox::new(0, 0, 100, 100),
            FaceBox::new(500, 500, 50, 50),
            FaceBox::new(100, 0, 100, 100),
        ];
        let mut uc = use_case(faces, Box::new(ThreadedFaceExecutor::new(3)));
        let report = uc.execute(&two_face_frame()).unwrap();

        assert_eq!(report.faces.len(), 3);
        assert!(report.faces[0].outcome.is_ok());
        assert!(matches!(
            report.faces[1].outcome,
            Err(AnalysisError::InvalidInput(_))
        ));
        assert_eq!(
            report.faces[2].outcome.as_ref().unwrap().category,
            AgeCategory::Elderly
        );
        assert_eq!(report.failed().count(), 1);
    }

    #[test]
    fn test_overhanging_box_is_clamped_before_cropping() {
        let mut uc = use_case(
            vec![FaceBox::new(-50, -50, 150, 150)],
            Box::new(SequentialFaceExecutor),
        );
        let report = uc.execute(&two_face_frame()).unwrap();
        let analysis = report.faces[0].outcome.as_ref().unwrap();
        // Visible part is the flat left half
        assert_eq!(analysis.category, AgeCategory::Young);
        assert_eq!(report.faces[0].face, FaceBox::new(-50, -50, 150, 150));
    }

    #[test]
    fn test_no_faces_gives_empty_report() {
        let mut uc = use_case(Vec::new(), Box::new(SequentialFaceExecutor));
        let report = uc.execute(&two_face_frame()).unwrap();
        assert!(report.faces.is_empty());
    }

    #[test]
    fn test_detector_failure_propagates() {
        let mut uc = AnalyzeFrameUseCase::new(
            Box::new(FailingDetector),
            analyzer(),
            Box::new(SequentialFaceExecutor),
        );
        let err = uc.execute(&two_face_frame()).unwrap_err();
        assert!(err.to_string().contains("camera unplugged"));
    }
}
