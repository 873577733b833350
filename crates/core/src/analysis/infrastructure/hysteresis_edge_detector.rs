use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::analysis::domain::edge_detector::EdgeDetector;
use crate::analysis::domain::edge_map::EdgeMap;
use crate::analysis::domain::face_region::ThresholdPair;
use crate::shared::frame::Frame;

/// Double-threshold edge operator on raw Sobel gradients.
///
/// Gradient magnitude is the L1 norm `|gx| + |gy|` of the 3x3 Sobel response
/// (replicated border), taking the strongest channel at each pixel. Pixels
/// above `high` are edges; pixels above `low` are edges when 8-connected to
/// one, transitively. No pre-smoothing and no thinning, so dense texture
/// reads as dense edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct HysteresisEdgeDetector;

impl HysteresisEdgeDetector {
    pub fn new() -> Self {
        Self
    }
}

impl EdgeDetector for HysteresisEdgeDetector {
    fn detect(&self, roi: &Frame, thresholds: ThresholdPair) -> EdgeMap {
        let w = roi.width() as usize;
        let h = roi.height() as usize;
        if w == 0 || h == 0 {
            return EdgeMap::empty(w, h);
        }
        let magnitude = gradient_magnitude(roi);
        hysteresis(&magnitude, w, h, thresholds)
    }
}

/// Per-pixel L1 Sobel magnitude, maximum over channels.
fn gradient_magnitude(roi: &Frame) -> Vec<f32> {
    let w = roi.width();
    let h = roi.height();
    let channels = roi.channels() as usize;
    let mut magnitude = vec![0.0f32; w as usize * h as usize];

    for c in 0..channels {
        let plane: Vec<u8> = roi.data().iter().skip(c).step_by(channels).copied().collect();
        let Some(gray) = GrayImage::from_raw(w, h, plane) else {
            continue;
        };
        let gx = horizontal_sobel(&gray);
        let gy = vertical_sobel(&gray);
        for ((m, &dx), &dy) in magnitude.iter_mut().zip(gx.as_raw()).zip(gy.as_raw()) {
            let l1 = (dx as f32).abs() + (dy as f32).abs();
            if l1 > *m {
                *m = l1;
            }
        }
    }
    magnitude
}

/// Marks strong pixels and grows them through 8-connected weak pixels.
fn hysteresis(magnitude: &[f32], w: usize, h: usize, thresholds: ThresholdPair) -> EdgeMap {
    let mut edges = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();

    for (i, &m) in magnitude.iter().enumerate() {
        if m > thresholds.high {
            edges[i] = true;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = (i % w, i / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let j = ny * w + nx;
                if !edges[j] && magnitude[j] > thresholds.low {
                    edges[j] = true;
                    stack.push(j);
                }
            }
        }
    }

    EdgeMap::new(w, h, edges)
}
