use crate::shared::frame::Frame;

use super::frame_report::FrameReport;

/// Receives each analysed frame together with its report.
pub trait ReportSink: Send {
    fn emit(&mut self, frame: &Frame, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush anything buffered once the run is over. Default: no-op.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
