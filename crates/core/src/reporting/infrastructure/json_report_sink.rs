use std::io::Write;

use serde::Serialize;

use crate::analysis::domain::age_classifier::AgeCategory;
use crate::reporting::domain::frame_report::{FaceReport, FrameReport};
use crate::reporting::domain::report_sink::ReportSink;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Writes one JSON object per frame, one per line.
pub struct JsonReportSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    faces: Vec<FaceRecord>,
}

#[derive(Serialize)]
struct FaceRecord {
    #[serde(rename = "box")]
    bbox: BoxRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<AgeCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BoxRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl From<&FaceBox> for BoxRecord {
    fn from(b: &FaceBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

impl From<&FaceReport> for FaceRecord {
    fn from(report: &FaceReport) -> Self {
        let mut record = FaceRecord {
            bbox: BoxRecord::from(&report.face),
            confidence: report.face.confidence,
            category: None,
            label: None,
            score: None,
            regions: None,
            error: None,
        };
        match &report.outcome {
            Ok(analysis) => {
                record.category = Some(analysis.category);
                record.label = Some(analysis.category.to_string());
                record.score = Some(analysis.score);
                record.regions = Some(analysis.results.len());
            }
            Err(e) => record.error = Some(e.to_string()),
        }
        record
    }
}

impl<W: Write + Send> ReportSink for JsonReportSink<W> {
    fn emit(&mut self, _frame: &Frame, report: &FrameReport) -> Result<(), Box<dyn std::error::Error>> {
        let record = FrameRecord {
            frame: report.frame_index,
            faces: report.faces.iter().map(FaceRecord::from).collect(),
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::analysis_error::AnalysisError;
    use crate::analysis::domain::face_analyzer::FaceAnalysis;

    fn analysis(category: AgeCategory, score: f64) -> FaceAnalysis {
        FaceAnalysis {
            category,
            score,
            results: Vec::new(),
            annotated: None,
        }
    }

    fn emit_lines(reports: &[FrameReport]) -> Vec<serde_json::Value> {
        let mut sink = JsonReportSink::new(Vec::new());
        let frame = Frame::filled(4, 4, [0, 0, 0], 0);
        for report in reports {
            sink.emit(&frame, report).unwrap();
        }
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        text.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_line_per_frame() {
        let reports = vec![
            FrameReport {
                frame_index: 0,
                faces: Vec::new(),
            },
            FrameReport {
                frame_index: 1,
                faces: Vec::new(),
            },
        ];
        let lines = emit_lines(&reports);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["frame"], 1);
        assert_eq!(lines[1]["faces"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_classified_face_fields() {
        let report = FrameReport {
            frame_index: 3,
            faces: vec![FaceReport {
                face: FaceBox::new(10, 20, 30, 40).with_confidence(0.5),
                outcome: Ok(analysis(AgeCategory::MiddleAged, 9.5)),
            }],
        };
        let face = &emit_lines(&[report])[0]["faces"][0];
        assert_eq!(face["box"]["x"], 10);
        assert_eq!(face["box"]["height"], 40);
        assert_eq!(face["confidence"], 0.5);
        assert_eq!(face["category"], "middle-aged");
        assert_eq!(face["label"], "Middle-aged");
        assert_eq!(face["score"], 9.5);
        assert_eq!(face["regions"], 0);
        assert!(face.get("error").is_none());
    }

    #[test]
    fn test_failed_face_carries_error_only() {
        let report = FrameReport {
            frame_index: 0,
            faces: vec![FaceReport {
                face: FaceBox::new(0, 0, 5, 5),
                outcome: Err(AnalysisError::NoValidRegions),
            }],
        };
        let face = &emit_lines(&[report])[0]["faces"][0];
        assert!(face["error"].as_str().unwrap().contains("no valid regions"));
        assert!(face.get("category").is_none());
        assert!(face.get("score").is_none());
        assert!(face.get("confidence").is_none());
    }
}
