use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Reports the same face rectangles for every frame.
///
/// Serves pre-cropped face images (one box covering the whole frame) and
/// footage where the face position is known in advance.
pub struct FixedRegionDetector {
    boxes: Option<Vec<FaceBox>>,
}

impl FixedRegionDetector {
    pub fn new(boxes: Vec<FaceBox>) -> Self {
        Self { boxes: Some(boxes) }
    }

    /// One box spanning each frame it sees.
    pub fn whole_frame() -> Self {
        Self { boxes: None }
    }
}

impl FaceDetector for FixedRegionDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        match &self.boxes {
            Some(boxes) => Ok(boxes.clone()),
            None if frame.is_empty() => Ok(Vec::new()),
            None => Ok(vec![FaceBox::new(
                0,
                0,
                frame.width() as i32,
                frame.height() as i32,
            )]),
        }
    }
}
