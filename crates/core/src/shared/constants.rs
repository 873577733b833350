pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

/// Side length of the canonical face crop the region layout is tuned for.
pub const DEFAULT_CANONICAL_SIZE: u32 = 250;

/// Wrinkle percentage above which a face is Middle-aged.
pub const DEFAULT_MIDDLE_AGED_CUTOFF: f64 = 8.0;

/// Wrinkle percentage above which a face is Elderly.
pub const DEFAULT_ELDERLY_CUTOFF: f64 = 15.0;
