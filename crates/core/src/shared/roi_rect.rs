/// Axis-aligned pixel rectangle inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Rectangles narrower or shorter than this carry no usable texture.
pub const MIN_ROI_SIDE: usize = 2;

impl RoiRect {
    /// Clips the rectangle spanning `center ± half_extent` to a
    /// `frame_w` × `frame_h` frame.
    ///
    /// Returns `None` when the clipped rectangle is inverted, empty, or
    /// thinner than [`MIN_ROI_SIDE`] on either axis.
    pub fn around(
        center: (i32, i32),
        half_extent: (i32, i32),
        frame_w: u32,
        frame_h: u32,
    ) -> Option<RoiRect> {
        let (cx, cy) = (center.0 as i64, center.1 as i64);
        let (hw, hh) = (half_extent.0 as i64, half_extent.1 as i64);

        let x1 = (cx - hw).max(0);
        let y1 = (cy - hh).max(0);
        let x2 = (cx + hw).min(frame_w as i64);
        let y2 = (cy + hh).min(frame_h as i64);

        if x1 >= x2 || y1 >= y2 {
            return None;
        }
        let w = (x2 - x1) as usize;
        let h = (y2 - y1) as usize;
        if w < MIN_ROI_SIDE || h < MIN_ROI_SIDE {
            return None;
        }
        Some(RoiRect {
            x: x1 as usize,
            y: y1 as usize,
            w,
            h,
        })
    }

    pub fn area(&self) -> usize {
        self.w * self.h
    }
}
