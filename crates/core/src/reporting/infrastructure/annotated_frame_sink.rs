use std::path::PathBuf;

use ab_glyph::{FontRef, InvalidFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::analysis::domain::age_classifier::AgeCategory;
use crate::reporting::domain::frame_report::FrameReport;
use crate::reporting::domain::report_sink::ReportSink;
use crate::shared::frame::Frame;
use crate::shared::roi_rect::RoiRect;
use crate::video::domain::image_writer::ImageWriter;

const LABEL_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");
const LABEL_SCALE: f32 = 14.0;
const LABEL_GAP: i32 = 2;
const BOX_THICKNESS: u32 = 2;
const FAILED_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

fn category_color(category: AgeCategory) -> Rgb<u8> {
    match category {
        AgeCategory::Young => Rgb([0, 200, 0]),
        AgeCategory::MiddleAged => Rgb([255, 165, 0]),
        AgeCategory::Elderly => Rgb([220, 0, 0]),
    }
}

/// Saves each frame with its face boxes outlined and labelled by category,
/// plus every face's annotated canonical crop when the analysis produced one.
///
/// Files land in `output_dir` as `frame_NNNNN.png` and
/// `frame_NNNNN_face_K.png`. Faces that failed analysis are outlined in gray
/// without a label.
pub struct AnnotatedFrameSink {
    writer: Box<dyn ImageWriter>,
    output_dir: PathBuf,
    font: FontRef<'static>,
}

impl AnnotatedFrameSink {
    pub fn new(writer: Box<dyn ImageWriter>, output_dir: PathBuf) -> Result<Self, InvalidFont> {
        Ok(Self {
            writer,
            output_dir,
            font: FontRef::try_from_slice(LABEL_FONT)?,
        })
    }

    /// Draws `text` just above the box, or inside its top edge when the box
    /// touches the top of the frame.
    fn draw_label(&self, img: &mut RgbImage, rect: RoiRect, color: Rgb<u8>, text: &str) {
        let above = rect.y as i32 - LABEL_SCALE as i32 - LABEL_GAP;
        let (x, y) = if above >= 0 {
            (rect.x as i32, above)
        } else {
            let inset = BOX_THICKNESS as i32 + LABEL_GAP;
            (rect.x as i32 + inset, rect.y as i32 + inset)
        };
        draw_text_mut(img, color, x, y, LABEL_SCALE, &self.font, text);
    }
}

impl ReportSink for AnnotatedFrameSink {
    fn emit(&mut self, frame: &Frame, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>> {
        let mut img = frame
            .to_rgb_image()
            .ok_or("annotated output needs an RGB frame")?;

        for face in &report.faces {
            let Some(rect) = face.face.clamp_to(frame.width(), frame.height()) else {
                continue;
            };
            let color = match &face.outcome {
                Ok(analysis) => category_color(analysis.category),
                Err(_) => FAILED_COLOR,
            };
            for inset in 0..BOX_THICKNESS {
                let (w, h) = (rect.w as u32, rect.h as u32);
                if w <= 2 * inset || h <= 2 * inset {
                    break;
                }
                let outline = Rect::at(rect.x as i32 + inset as i32, rect.y as i32 + inset as i32)
                    .of_size(w - 2 * inset, h - 2 * inset);
                draw_hollow_rect_mut(&mut img, outline, color);
            }
            if let Ok(analysis) = &face.outcome {
                let label = format!("Age Category: {}", analysis.category);
                self.draw_label(&mut img, rect, color, &label);
            }
        }

        let stem = format!("frame_{:05}", report.frame_index);
        let outlined = Frame::from_rgb_image(img, frame.index());
        self.writer
            .write(&self.output_dir.join(format!("{stem}.png")), &outlined)?;

        for (k, face) in report.faces.iter().enumerate() {
            if let Ok(analysis) = &face.outcome {
                if let Some(annotated) = &analysis.annotated {
                    self.writer
                        .write(&self.output_dir.join(format!("{stem}_face_{k}.png")), annotated)?;
                }
            }
        }
        Ok(())
    }
}
