//! YOLO face detector running on ONNX Runtime via `ort`.
//!
//! Letterboxes the frame to the model input, keeps detections above the
//! confidence threshold, suppresses overlaps greedily and maps the survivors
//! back to frame coordinates.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

use super::execution_provider::preferred_execution_providers;

/// Input resolution used when the model leaves it dynamic.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default minimum detection confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

const NMS_IOU_THRESH: f64 = 0.45;

/// YOLO letterbox padding value.
const PAD_VALUE: f32 = 114.0 / 255.0;

pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model.
    ///
    /// The input resolution comes from the model's NCHW input shape, falling
    /// back to 640 when it is dynamic.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { shape, .. } if shape.len() >= 4 && shape[2] > 0 => {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded face model {} ({input_size}x{input_size}, confidence {confidence})",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }

        let letterboxed = letterbox(frame, self.input_size);
        let input = ort::value::Tensor::from_array(letterboxed.tensor.clone())?;
        let outputs = self.session.run(ort::inputs![input])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let mut detections = parse_detections(data, shape[1], shape[2], self.confidence, &letterboxed);
        let kept = nms(&mut detections, NMS_IOU_THRESH);

        Ok(kept
            .iter()
            .filter_map(|d| d.to_face_box(frame.width(), frame.height()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

struct Letterbox {
    tensor: ndarray::Array4<f32>,
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

/// Scale the frame into a `target_size` square, keeping aspect ratio, and
/// pad the rest. Produces an NCHW float tensor in `[0, 1]`.
fn letterbox(frame: &Frame, target_size: u32) -> Letterbox {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let size = target_size as usize;
    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, size, size), PAD_VALUE);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    for y in 0..new_h as usize {
        let sy = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let sx = ((x as f64 / scale) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, pad_y as usize + y, pad_x as usize + x]] =
                    src[[sy, sx, c]] as f32 / 255.0;
            }
        }
    }

    Letterbox {
        tensor,
        scale,
        pad_x,
        pad_y,
    }
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct RawDetection {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    confidence: f64,
}

impl RawDetection {
    /// Integer box clamped to the frame; `None` if nothing is left.
    fn to_face_box(&self, frame_w: u32, frame_h: u32) -> Option<FaceBox> {
        let x1 = self.x1.floor().clamp(0.0, frame_w as f64) as i32;
        let y1 = self.y1.floor().clamp(0.0, frame_h as f64) as i32;
        let x2 = self.x2.ceil().clamp(0.0, frame_w as f64) as i32;
        let y2 = self.y2.ceil().clamp(0.0, frame_h as f64) as i32;
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(FaceBox::new(x1, y1, x2 - x1, y2 - y1).with_confidence(self.confidence as f32))
    }
}

/// Reads `[cx, cy, w, h, conf, ...]` rows from either output layout
/// (`[1, features, detections]` or `[1, detections, features]`) and maps the
/// confident ones back out of the letterbox.
fn parse_detections(
    data: &[f32],
    dim1: usize,
    dim2: usize,
    min_confidence: f64,
    letterbox: &Letterbox,
) -> Vec<RawDetection> {
    let transposed = dim1 < dim2;
    let (num_dets, num_feats) = if transposed { (dim2, dim1) } else { (dim1, dim2) };
    if num_feats < 5 {
        return Vec::new();
    }
    let value = |det: usize, feat: usize| -> f64 {
        let i = if transposed {
            feat * num_dets + det
        } else {
            det * num_feats + feat
        };
        data[i] as f64
    };

    let pad_x = letterbox.pad_x as f64;
    let pad_y = letterbox.pad_y as f64;
    (0..num_dets)
        .filter_map(|i| {
            let confidence = value(i, 4);
            if confidence < min_confidence {
                return None;
            }
            let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
            Some(RawDetection {
                x1: (cx - w / 2.0 - pad_x) / letterbox.scale,
                y1: (cy - h / 2.0 - pad_y) / letterbox.scale,
                x2: (cx + w / 2.0 - pad_x) / letterbox.scale,
                y2: (cy + h / 2.0 - pad_y) / letterbox.scale,
                confidence,
            })
        })
        .collect()
}

/// Greedy NMS: highest confidence first, drop boxes overlapping a kept one.
fn nms(dets: &mut [RawDetection], iou_thresh: f64) -> Vec<RawDetection> {
    dets.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<RawDetection> = Vec::new();
    for det in dets.iter() {
        let overlaps = keep.iter().any(|k| {
            bbox_iou(&[k.x1, k.y1, k.x2, k.y2], &[det.x1, det.y1, det.x2, det.y2]) > iou_thresh
        });
        if !overlaps {
            keep.push(det.clone());
        }
    }
    keep
}

fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> RawDetection {
        RawDetection {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    #[test]
    fn test_letterbox_wide_frame_pads_vertically() {
        // scale = min(640/200, 640/100) = 3.2 -> 640x320, 160 rows of padding above
        let frame = Frame::filled(200, 100, [255, 255, 255], 0);
        let lb = letterbox(&frame, 640);
        assert_eq!(lb.tensor.shape(), &[1, 3, 640, 640]);
        assert_relative_eq!(lb.scale, 3.2, epsilon = 1e-9);
        assert_eq!((lb.pad_x, lb.pad_y), (0, 160));
        assert_relative_eq!(lb.tensor[[0, 0, 0, 0]], PAD_VALUE);
        assert_relative_eq!(lb.tensor[[0, 2, 161, 1]], 1.0);
    }

    #[test]
    fn test_letterbox_square_frame_has_no_padding() {
        let frame = Frame::filled(100, 100, [128, 128, 128], 0);
        let lb = letterbox(&frame, 640);
        assert_relative_eq!(lb.scale, 6.4, epsilon = 1e-9);
        assert_eq!((lb.pad_x, lb.pad_y), (0, 0));
    }

    #[test]
    fn test_parse_maps_back_through_letterbox() {
        let frame = Frame::filled(200, 100, [0, 0, 0], 0);
        let lb = letterbox(&frame, 640);
        // Row layout, 6 detections x 5 features; only the first is confident:
        // center (320, 320), 64x64, conf 0.9
        let mut data = vec![0.0f32; 6 * 5];
        data[..5].copy_from_slice(&[320.0, 320.0, 64.0, 64.0, 0.9]);
        let dets = parse_detections(&data, 6, 5, 0.25, &lb);
        assert_eq!(dets.len(), 1);
        // (288 - 0) / 3.2 = 90, (288 - 160) / 3.2 = 40
        assert_relative_eq!(dets[0].x1, 90.0, epsilon = 1e-9);
        assert_relative_eq!(dets[0].y1, 40.0, epsilon = 1e-9);
        assert_relative_eq!(dets[0].x2, 110.0, epsilon = 1e-9);
        assert_relative_eq!(dets[0].y2, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_reads_transposed_layout_and_filters_confidence() {
        let frame = Frame::filled(640, 640, [0, 0, 0], 0);
        let lb = letterbox(&frame, 640);
        // 5 features x 2 detections, feature-major; second is below threshold
        let data = [
            100.0, 300.0, // cx
            100.0, 300.0, // cy
            20.0, 20.0, // w
            40.0, 40.0, // h
            0.8, 0.1, // conf
        ];
        let dets = parse_detections(&data, 5, 2, 0.25, &lb);
        assert_eq!(dets.len(), 1);
        assert_relative_eq!(dets[0].x1, 90.0, epsilon = 1e-9);
        assert_relative_eq!(dets[0].y2, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_face_box_is_clamped_to_frame() {
        let b = det(-5.2, 10.4, 60.3, 130.0, 0.7).to_face_box(50, 100).unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (0, 10, 50, 90));
        assert_relative_eq!(b.confidence.unwrap(), 0.7);
    }

    #[test]
    fn test_face_box_outside_frame_is_dropped() {
        assert!(det(120.0, 0.0, 150.0, 20.0, 0.9).to_face_box(100, 100).is_none());
    }

    #[test]
    fn test_nms_suppresses_overlapping_keeps_most_confident() {
        let mut dets = vec![
            det(0.0, 0.0, 100.0, 100.0, 0.5),
            det(2.0, 2.0, 102.0, 102.0, 0.9),
            det(200.0, 200.0, 250.0, 250.0, 0.6),
        ];
        let kept = nms(&mut dets, 0.45);
        let confidences: Vec<f64> = kept.iter().map(|d| d.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.6]);
    }

    #[test]
    fn test_nms_empty_input() {
        let mut dets: Vec<RawDetection> = Vec::new();
        assert!(nms(&mut dets, 0.45).is_empty());
    }

    #[test]
    fn test_bbox_iou() {
        assert_eq!(bbox_iou(&[0.0, 0.0, 10.0, 10.0], &[20.0, 20.0, 30.0, 30.0]), 0.0);
        let b = [0.0, 0.0, 10.0, 10.0];
        assert_relative_eq!(bbox_iou(&b, &b), 1.0);
        // Half overlap: 50 / (100 + 100 - 50)
        assert_relative_eq!(bbox_iou(&b, &[5.0, 0.0, 15.0, 10.0]), 1.0 / 3.0);
    }
}
