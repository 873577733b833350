use std::path::Path;

use ffmpeg_next::format::Pixel;
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling::{Context as Scaler, Flags};
use ffmpeg_next::util::frame::video::Video;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Decodes the best video stream of a file via ffmpeg-next, converting each
/// frame to RGB24.
///
/// Frames are pulled lazily, one decoded picture per call, so long clips are
/// never buffered in memory.
pub struct FfmpegFrameSource {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Scaler,
    width: u32,
    height: u32,
    stream_index: usize,
    total: Option<usize>,
    next_index: usize,
    flushing: bool,
    done: bool,
}

// Safety: the source is driven from one thread at a time. The raw pointers
// inside the ffmpeg types are never shared across threads.
unsafe impl Send for FfmpegFrameSource {}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| format!("{}: no video stream found", path.display()))?;

        let stream_index = stream.index();
        // Containers that do not record a frame count report zero.
        let total = usize::try_from(stream.frames()).ok().filter(|&n| n > 0);
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = Scaler::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            Flags::BILINEAR,
        )?;

        log::info!(
            "Opened {}: {width}x{height}, {} frame(s)",
            path.display(),
            total.map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        Ok(Self {
            ictx,
            decoder,
            scaler,
            width,
            height,
            stream_index,
            total,
            next_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;

        let mut rgb = Video::empty();
        if let Err(e) = self.scaler.run(&decoded, &mut rgb) {
            return Some(Err(format!("frame {index}: {e}").into()));
        }
        let pixels = extract_rgb_pixels(&rgb, self.width, self.height);
        Some(Ok(Frame::new(pixels, self.width, self.height, 3, index)))
    }
}

impl FrameSource for FfmpegFrameSource {
    fn next_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.stream_index {
                continue;
            }

            if let Err(e) = self.decoder.send_packet(&packet) {
                log::warn!("Dropping undecodable packet: {e}");
                continue;
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }

    fn total_frames(&self) -> Option<usize> {
        self.total
    }
}

/// Copies an RGB24 picture into a tightly packed buffer, dropping the row
/// padding ffmpeg may add (stride > width * 3).
fn extract_rgb_pixels(rgb: &Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}
