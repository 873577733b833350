pub mod execution_provider;
pub mod fixed_region_detector;
pub mod model_resolver;
pub mod onnx_yolo_detector;
