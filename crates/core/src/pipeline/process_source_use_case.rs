use std::collections::BTreeMap;
use std::time::Instant;

use crate::analysis::domain::age_classifier::AgeCategory;
use crate::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::reporting::domain::report_sink::ReportSink;
use crate::video::domain::frame_source::FrameSource;

/// Totals for one run over a frame source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_analyzed: usize,
    /// Frames lost to acquisition, detection or executor failures.
    pub frames_skipped: usize,
    pub faces_classified: usize,
    pub faces_skipped: usize,
    pub categories: BTreeMap<AgeCategory, usize>,
}

/// Drives a frame source through detection and analysis into a report sink.
///
/// A frame that cannot be read, or whose detection fails, is logged and
/// skipped; later frames carry on. A sink failure ends the run.
pub struct ProcessSourceUseCase {
    source: Box<dyn FrameSource>,
    analyze: AnalyzeFrameUseCase,
    sink: Box<dyn ReportSink>,
    logger: Box<dyn PipelineLogger>,
}

impl ProcessSourceUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        analyze: AnalyzeFrameUseCase,
        sink: Box<dyn ReportSink>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            analyze,
            sink,
            logger,
        }
    }

    pub fn execute(&mut self) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let total = self.source.total_frames();
        let mut summary = RunSummary::default();
        let mut cycles = 0usize;

        while let Some(next) = self.source.next_frame() {
            cycles += 1;
            let frame = match next {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping frame: {e}");
                    summary.frames_skipped += 1;
                    self.logger.progress(cycles, total);
                    continue;
                }
            };

            let t0 = Instant::now();
            let detected = self.analyze.detect(&frame);
            self.logger.timing("detect", ms_since(t0));
            let faces = match detected {
                Ok(faces) => faces,
                Err(e) => {
                    log::warn!("Face detection failed on frame {}: {e}", frame.index());
                    summary.frames_skipped += 1;
                    self.logger.progress(cycles, total);
                    continue;
                }
            };
            self.logger.metric("faces", faces.len() as f64);

            let t1 = Instant::now();
            let analysed = self.analyze.analyze(&frame, faces);
            self.logger.timing("analyze", ms_since(t1));
            let report = match analysed {
                Ok(report) => report,
                Err(e) => {
                    log::warn!("Analysis failed on frame {}: {e}", frame.index());
                    summary.frames_skipped += 1;
                    self.logger.progress(cycles, total);
                    continue;
                }
            };

            for (face, analysis) in report.classified() {
                log::debug!(
                    "Frame {}: face at ({}, {}) {} ({:.2}%)",
                    report.frame_index,
                    face.x,
                    face.y,
                    analysis.category,
                    analysis.score
                );
                summary.faces_classified += 1;
                *summary.categories.entry(analysis.category).or_default() += 1;
            }
            for (face, error) in report.failed() {
                log::warn!(
                    "Frame {}: face at ({}, {}) skipped: {error}",
                    report.frame_index,
                    face.x,
                    face.y
                );
                summary.faces_skipped += 1;
            }

            let t2 = Instant::now();
            self.sink.emit(&frame, &report)?;
            self.logger.timing("emit", ms_since(t2));

            summary.frames_analyzed += 1;
            self.logger.progress(cycles, total);
        }

        self.sink.finish()?;
        self.logger.info(&format!(
            "Analysed {} frame(s), skipped {}; classified {} face(s), skipped {}",
            summary.frames_analyzed,
            summary.frames_skipped,
            summary.faces_classified,
            summary.faces_skipped
        ));
        self.logger.summary();
        Ok(summary)
    }
}

fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
