use crate::analysis::domain::edge_detector::{EdgeDetector, EdgeOperator};

use super::canny_edge_detector::CannyEdgeDetector;
use super::hysteresis_edge_detector::HysteresisEdgeDetector;

/// Create the edge detector for the configured operator.
pub fn create_edge_detector(operator: EdgeOperator) -> Box<dyn EdgeDetector> {
    log::info!("Using {operator} edge operator");
    match operator {
        EdgeOperator::Hysteresis => Box::new(HysteresisEdgeDetector::new()),
        EdgeOperator::Canny => Box::new(CannyEdgeDetector::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::face_region::ThresholdPair;
    use crate::shared::frame::Frame;
    use rstest::rstest;

    #[rstest]
    #[case(EdgeOperator::Hysteresis)]
    #[case(EdgeOperator::Canny)]
    fn test_every_operator_maps_uniform_crop_to_empty(#[case] operator: EdgeOperator) {
        let detector = create_edge_detector(operator);
        let roi = Frame::filled(30, 20, [200, 10, 90], 0);
        let map = detector.detect(&roi, ThresholdPair::new(8.0, 170.0));
        assert_eq!((map.width(), map.height()), (30, 20));
        assert_eq!(map.edge_count(), 0);
    }
}
