use crate::shared::frame::Frame;

/// Supplies frames to analyse, one per cycle.
pub trait FrameSource: Send {
    /// The next frame, `Some(Err)` when this cycle's frame could not be
    /// acquired, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>>;

    /// Number of frames the source will yield, when known up front.
    fn total_frames(&self) -> Option<usize> {
        None
    }
}
