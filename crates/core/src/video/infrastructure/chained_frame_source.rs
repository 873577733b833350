use std::collections::VecDeque;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Plays several sources back to back as one stream.
///
/// Frames are re-indexed by their position in the combined stream. A failed
/// acquisition still consumes an index, matching the per-source convention.
pub struct ChainedFrameSource {
    sources: VecDeque<Box<dyn FrameSource>>,
    total: Option<usize>,
    next_index: usize,
}

impl ChainedFrameSource {
    pub fn new(sources: Vec<Box<dyn FrameSource>>) -> Self {
        let total = sources.iter().map(|s| s.total_frames()).sum();
        Self {
            sources: sources.into(),
            total,
            next_index: 0,
        }
    }
}

impl FrameSource for ChainedFrameSource {
    fn next_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        loop {
            let source = self.sources.front_mut()?;
            match source.next_frame() {
                Some(result) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    return Some(result.map(|frame| frame.with_index(index)));
                }
                None => {
                    self.sources.pop_front();
                }
            }
        }
    }

    fn total_frames(&self) -> Option<usize> {
        self.total
    }
}
