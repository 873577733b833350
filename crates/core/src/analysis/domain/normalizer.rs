use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

use crate::shared::frame::Frame;

use super::analysis_error::AnalysisError;

/// Resamples `image` to `target_width` × `target_height` by area averaging.
///
/// A box filter averages the source pixels under each output pixel's
/// footprint when shrinking and replicates the nearest source pixel when
/// enlarging. Weights are non-negative, so no overshoot or ringing is
/// introduced in either direction. Gray and RGB crops are supported.
pub fn normalize(
    image: &Frame,
    target_width: u32,
    target_height: u32,
) -> Result<Frame, AnalysisError> {
    if image.is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "face crop has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }
    if target_width == 0 || target_height == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "target size must be positive, got {target_width}x{target_height}"
        )));
    }
    if image.width() == target_width && image.height() == target_height {
        return Ok(image.clone());
    }

    let pixel_type = match image.channels() {
        1 => PixelType::U8,
        3 => PixelType::U8x3,
        n => {
            return Err(AnalysisError::InvalidInput(format!(
                "cannot resample a {n}-channel crop"
            )))
        }
    };

    let src = ImageRef::new(image.width(), image.height(), image.data(), pixel_type)
        .map_err(|e| AnalysisError::InvalidInput(format!("malformed face crop: {e}")))?;
    let mut dst = Image::new(target_width, target_height, pixel_type);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));
    Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .map_err(|e| AnalysisError::InvalidInput(format!("resampling failed: {e}")))?;

    Ok(Frame::new(
        dst.buffer().to_vec(),
        target_width,
        target_height,
        image.channels(),
        image.index(),
    ))
}
