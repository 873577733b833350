use ndarray::ArrayView3;

use super::roi_rect::RoiRect;

/// A single frame or face crop: contiguous interleaved bytes in row-major order.
///
/// Every source in this crate produces 3-channel RGB; the analysis stages
/// accept any channel count.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A frame filled with a single RGB color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(data, width, height, 3, index)
    }

    pub fn from_rgb_image(img: image::RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3, index)
    }

    /// Copies the pixels into an `RgbImage`; `None` unless the frame is 3-channel.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        if self.channels != 3 {
            return None;
        }
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The same pixels under a new frame index.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0
    }

    /// Copies out the sub-image under `rect`.
    ///
    /// `rect` must lie inside the frame; callers clip first.
    pub fn crop(&self, rect: RoiRect) -> Frame {
        debug_assert!(rect.x + rect.w <= self.width as usize);
        debug_assert!(rect.y + rect.h <= self.height as usize);
        let channels = self.channels as usize;
        let row_bytes = rect.w * channels;
        let mut data = Vec::with_capacity(rect.h * row_bytes);
        for row in rect.y..rect.y + rect.h {
            let start = (row * self.width as usize + rect.x) * channels;
            data.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Frame::new(data, rect.w as u32, rect.h as u32, self.channels, self.index)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
