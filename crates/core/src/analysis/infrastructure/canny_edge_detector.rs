use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;

use crate::analysis::domain::edge_detector::EdgeDetector;
use crate::analysis::domain::edge_map::EdgeMap;
use crate::analysis::domain::face_region::ThresholdPair;
use crate::shared::frame::Frame;

/// Classic Canny on the luma channel: Gaussian smoothing, non-maximum
/// suppression and hysteresis with the region's thresholds.
///
/// Produces thin contours, so densities run well below the hysteresis
/// operator's on the same crop and the default cutoffs will rarely fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannyEdgeDetector;

impl CannyEdgeDetector {
    pub fn new() -> Self {
        Self
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect(&self, roi: &Frame, thresholds: ThresholdPair) -> EdgeMap {
        let w = roi.width() as usize;
        let h = roi.height() as usize;
        let Some(gray) = to_luma(roi) else {
            return EdgeMap::empty(w, h);
        };
        let edges = canny(&gray, thresholds.low, thresholds.high);
        EdgeMap::from_gray(w, h, edges.as_raw())
    }
}

fn to_luma(roi: &Frame) -> Option<GrayImage> {
    if roi.is_empty() {
        return None;
    }
    match roi.channels() {
        1 => GrayImage::from_raw(roi.width(), roi.height(), roi.data().to_vec()),
        3 => roi
            .to_rgb_image()
            .map(|rgb| DynamicImage::ImageRgb8(rgb).to_luma8()),
        _ => None,
    }
}
