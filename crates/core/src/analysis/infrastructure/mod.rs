pub mod canny_edge_detector;
pub mod edge_detector_factory;
pub mod hysteresis_edge_detector;
