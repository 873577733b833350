use super::roi_rect::RoiRect;

/// Axis-aligned face rectangle reported by a detector, in frame coordinates.
///
/// May extend past the frame; [`FaceBox::clamp_to`] yields the visible part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Detector confidence, when the detector provides one.
    pub confidence: Option<f32>,
}

impl FaceBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Visible part of the box inside a `frame_w` × `frame_h` frame.
    ///
    /// Returns `None` when nothing of the box is visible.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<RoiRect> {
        let x1 = (self.x as i64).max(0);
        let y1 = (self.y as i64).max(0);
        let x2 = (self.x as i64 + self.width as i64).min(frame_w as i64);
        let y2 = (self.y as i64 + self.height as i64).min(frame_h as i64);
        if x1 >= x2 || y1 >= y2 {
            return None;
        }
        Some(RoiRect {
            x: x1 as usize,
            y: y1 as usize,
            w: (x2 - x1) as usize,
            h: (y2 - y1) as usize,
        })
    }
}
