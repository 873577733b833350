use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Finds face rectangles in a frame.
///
/// Implementations may keep state between frames (model sessions, caches),
/// hence `&mut self`. Boxes are returned in detection order and may extend
/// past the frame; callers clamp before cropping.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}
