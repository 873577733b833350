use crate::reporting::domain::frame_report::FrameReport;
use crate::reporting::domain::report_sink::ReportSink;
use crate::shared::frame::Frame;

/// Forwards every frame to each inner sink in turn; the first failure stops
/// the chain.
pub struct CompositeReportSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl CompositeReportSink {
    pub fn new(sinks: Vec<Box<dyn ReportSink>>) -> Self {
        Self { sinks }
    }
}

impl ReportSink for CompositeReportSink {
    fn emit(&mut self, frame: &Frame, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>> {
        for sink in &mut self.sinks {
            sink.emit(frame, report)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
