use std::thread;

use crate::analysis::domain::face_analyzer::FaceAnalyzer;
use crate::pipeline::face_analysis_executor::{FaceAnalysisExecutor, FaceOutcome};
use crate::shared::frame::Frame;

/// Analyses the faces of a frame on a bounded pool of scoped worker threads.
///
/// Jobs go through a bounded crossbeam queue tagged with their position;
/// outcomes are slotted back by that position, so the result order always
/// matches the input order regardless of which worker finishes first.
pub struct ThreadedFaceExecutor {
    workers: usize,
}

impl ThreadedFaceExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per available core.
    pub fn with_available_parallelism() -> Self {
        Self::new(thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl FaceAnalysisExecutor for ThreadedFaceExecutor {
    fn analyze_all(
        &self,
        analyzer: &FaceAnalyzer,
        crops: &[Frame],
    ) -> Result<Vec<FaceOutcome>, Box<dyn std::error::Error>> {
        if crops.len() <= 1 || self.workers == 1 {
            return Ok(crops.iter().map(|crop| analyzer.analyze_face(crop)).collect());
        }

        let workers = self.workers.min(crops.len());
        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, &Frame)>(workers * 2);
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, FaceOutcome)>();

        let panicked = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let done_tx = done_tx.clone();
                    scope.spawn(move || {
                        for (i, crop) in job_rx {
                            if done_tx.send((i, analyzer.analyze_face(crop))).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(done_tx);

            for job in crops.iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            handles
                .into_iter()
                .map(|h| h.join())
                .filter(Result::is_err)
                .count()
        });

        if panicked > 0 {
            return Err(format!("{panicked} face analysis worker(s) panicked").into());
        }

        let mut slots: Vec<Option<FaceOutcome>> = (0..crops.len()).map(|_| None).collect();
        for (i, outcome) in done_rx {
            slots[i] = Some(outcome);
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| -> Box<dyn std::error::Error> {
                    format!("face {i} produced no result").into()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::analysis_config::AnalysisConfig;
    use crate::analysis::domain::analysis_error::AnalysisError;
    use crate::analysis::domain::edge_detector::EdgeDetector;
    use crate::analysis::domain::edge_map::EdgeMap;
    use crate::analysis::domain::face_region::ThresholdPair;
    use crate::analysis::infrastructure::hysteresis_edge_detector::HysteresisEdgeDetector;
    use crate::pipeline::face_analysis_executor::SequentialFaceExecutor;
    use rstest::rstest;

    fn analyzer() -> FaceAnalyzer {
        FaceAnalyzer::new(
            &AnalysisConfig::default(),
            Box::new(HysteresisEdgeDetector::new()),
        )
        .unwrap()
    }

    /// Crops of different sizes and textures so outcomes are distinguishable.
    fn crops() -> Vec<Frame> {
        (0..9u32)
            .map(|i| {
                let size = 40 + i * 17;
                let cell = 1 + i % 4;
                let mut data = Vec::new();
                for y in 0..size {
                    for x in 0..size {
                        let v = if ((x / cell) + (y / cell)) % 2 == 0 { 30 } else { 30 + 25 * i as u8 };
                        data.extend_from_slice(&[v, v, v]);
                    }
                }
                Frame::new(data, size, size, 3, i as usize)
            })
            .chain(std::iter::once(Frame::new(Vec::new(), 0, 0, 3, 9)))
            .collect()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[case(16)]
    fn test_matches_sequential_in_order(#[case] workers: usize) {
        let analyzer = analyzer();
        let crops = crops();
        let expected = SequentialFaceExecutor.analyze_all(&analyzer, &crops).unwrap();
        let actual = ThreadedFaceExecutor::new(workers)
            .analyze_all(&analyzer, &crops)
            .unwrap();
        assert_eq!(actual, expected);
        assert!(matches!(actual[9], Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_batch() {
        let outcomes = ThreadedFaceExecutor::new(4)
            .analyze_all(&analyzer(), &[])
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_zero_workers_means_one() {
        assert_eq!(ThreadedFaceExecutor::new(0).workers(), 1);
    }

    struct PanickingDetector;

    impl EdgeDetector for PanickingDetector {
        fn detect(&self, _roi: &Frame, _thresholds: ThresholdPair) -> EdgeMap {
            panic!("detector blew up");
        }
    }

    #[test]
    fn test_worker_panic_becomes_error() {
        let analyzer =
            FaceAnalyzer::new(&AnalysisConfig::default(), Box::new(PanickingDetector)).unwrap();
        let crops = vec![Frame::filled(50, 50, [0, 0, 0], 0); 3];
        let result = ThreadedFaceExecutor::new(2).analyze_all(&analyzer, &crops);
        assert!(result.is_err());
    }
}
