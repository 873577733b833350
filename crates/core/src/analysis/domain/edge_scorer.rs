use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::shared::frame::Frame;
use crate::shared::roi_rect::RoiRect;

use super::edge_detector::EdgeDetector;
use super::edge_map::EdgeMap;
use super::face_region::{FaceRegion, RegionKind};

const ROI_OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Edge map of one surviving region and where it sits in the crop.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeResult {
    pub kind: RegionKind,
    pub top_left: (usize, usize),
    pub edge_map: EdgeMap,
}

impl EdgeResult {
    pub fn rect(&self) -> RoiRect {
        RoiRect {
            x: self.top_left.0,
            y: self.top_left.1,
            w: self.edge_map.width(),
            h: self.edge_map.height(),
        }
    }
}

/// Runs the edge operator over each region of a canonical crop.
pub struct EdgeScorer {
    detector: Box<dyn EdgeDetector>,
}

impl EdgeScorer {
    pub fn new(detector: Box<dyn EdgeDetector>) -> Self {
        Self { detector }
    }

    /// One result per region whose clipped rectangle is usable, in region order.
    ///
    /// Regions clipped to nothing (or to a sliver under two pixels) are
    /// dropped rather than scored as zero.
    pub fn score(&self, canonical: &Frame, regions: &[FaceRegion]) -> Vec<EdgeResult> {
        regions
            .iter()
            .filter_map(|region| {
                let Some(rect) = RoiRect::around(
                    region.center,
                    region.half_extent,
                    canonical.width(),
                    canonical.height(),
                ) else {
                    log::debug!(
                        "Skipping {} region at {:?}: clipped to nothing",
                        region.kind,
                        region.center
                    );
                    return None;
                };

                let roi = canonical.crop(rect);
                let edge_map = self.detector.detect(&roi, region.thresholds);
                log::debug!(
                    "{} region {}x{} at ({}, {}): {} edge pixels",
                    region.kind,
                    rect.w,
                    rect.h,
                    rect.x,
                    rect.y,
                    edge_map.edge_count()
                );
                Some(EdgeResult {
                    kind: region.kind,
                    top_left: (rect.x, rect.y),
                    edge_map,
                })
            })
            .collect()
    }
}

/// Renders the scored regions onto a copy of the canonical crop.
///
/// Each region is outlined in green and its pixels replaced by the edge map.
/// Returns `None` for crops that are not RGB.
pub fn annotate(canonical: &Frame, results: &[EdgeResult]) -> Option<Frame> {
    let mut img = canonical.to_rgb_image()?;

    for result in results {
        let r = result.rect();
        // Two nested outlines just outside the ROI give a 2px border.
        for grow in 1..=2 {
            let outline = Rect::at(r.x as i32 - grow, r.y as i32 - grow)
                .of_size(r.w as u32 + 2 * grow as u32, r.h as u32 + 2 * grow as u32);
            draw_hollow_rect_mut(&mut img, outline, ROI_OUTLINE_COLOR);
        }

        for y in 0..r.h {
            for x in 0..r.w {
                let v = if result.edge_map.is_edge(x, y) { 255 } else { 0 };
                img.put_pixel((r.x + x) as u32, (r.y + y) as u32, Rgb([v, v, v]));
            }
        }
    }

    Some(Frame::from_rgb_image(img, canonical.index()))
}
