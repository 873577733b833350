use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use wrinkle_age_core::analysis::domain::analysis_config::AnalysisConfig;
use wrinkle_age_core::analysis::domain::edge_detector::EdgeOperator;
use wrinkle_age_core::analysis::domain::face_analyzer::FaceAnalyzer;
use wrinkle_age_core::analysis::infrastructure::edge_detector_factory::create_edge_detector;
use wrinkle_age_core::detection::domain::face_detector::FaceDetector;
use wrinkle_age_core::detection::infrastructure::fixed_region_detector::FixedRegionDetector;
use wrinkle_age_core::detection::infrastructure::model_resolver;
use wrinkle_age_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use wrinkle_age_core::pipeline::analyze_frame_use_case::AnalyzeFrameUseCase;
use wrinkle_age_core::pipeline::face_analysis_executor::{
    FaceAnalysisExecutor, SequentialFaceExecutor,
};
use wrinkle_age_core::pipeline::infrastructure::threaded_face_executor::ThreadedFaceExecutor;
use wrinkle_age_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use wrinkle_age_core::pipeline::process_source_use_case::{ProcessSourceUseCase, RunSummary};
use wrinkle_age_core::reporting::domain::report_sink::ReportSink;
use wrinkle_age_core::reporting::infrastructure::annotated_frame_sink::AnnotatedFrameSink;
use wrinkle_age_core::reporting::infrastructure::composite_report_sink::CompositeReportSink;
use wrinkle_age_core::reporting::infrastructure::json_report_sink::JsonReportSink;
use wrinkle_age_core::shared::constants::{VIDEO_EXTENSIONS, YOLO_MODEL_NAME, YOLO_MODEL_URL};
use wrinkle_age_core::shared::face_box::FaceBox;
use wrinkle_age_core::video::domain::frame_source::FrameSource;
use wrinkle_age_core::video::infrastructure::chained_frame_source::ChainedFrameSource;
#[cfg(feature = "video")]
use wrinkle_age_core::video::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
use wrinkle_age_core::video::infrastructure::image_file_source::ImageFileSource;
use wrinkle_age_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Estimate an age bracket for every face in a set of images from the
/// density of skin wrinkles.
#[derive(Parser)]
#[command(name = "wrinkle-age")]
struct Cli {
    /// Image files, directories of images, or video files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with analysis settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the canonical face crop.
    #[arg(long)]
    canonical_size: Option<u32>,

    /// Wrinkle percentage above which a face is Middle-aged.
    #[arg(long)]
    middle_cutoff: Option<f64>,

    /// Wrinkle percentage above which a face is Elderly.
    #[arg(long)]
    elderly_cutoff: Option<f64>,

    /// Edge operator: hysteresis or canny.
    #[arg(long)]
    edge_operator: Option<String>,

    /// Face analysis worker threads (default: one per core).
    #[arg(long)]
    workers: Option<usize>,

    /// Write outlined frames and annotated face crops to this directory.
    #[arg(long)]
    annotate_dir: Option<PathBuf>,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Known face box as x,y,width,height (repeatable); skips the detector.
    #[arg(long = "face", value_parser = parse_face_box)]
    faces: Vec<FaceBox>,

    /// Treat every image as one pre-cropped face; skips the detector.
    #[arg(long, conflicts_with = "faces")]
    whole_frame: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let analyzer = FaceAnalyzer::new(&config, create_edge_detector(config.edge_operator))?;
    let detector = build_detector(&cli)?;
    let executor = build_executor(cli.workers);
    let source = build_source(&cli.inputs)?;
    let sink = build_sink(&cli)?;

    let analyze = AnalyzeFrameUseCase::new(detector, analyzer, executor);
    let mut use_case = ProcessSourceUseCase::new(
        source,
        analyze,
        sink,
        Box::new(StdoutPipelineLogger::default()),
    );
    let summary = use_case.execute()?;
    log_summary(&summary);
    Ok(())
}

/// Defaults, then the JSON file, then individual flags.
fn build_config(cli: &Cli) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .map_err(|e| format!("Invalid config {}: {e}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(size) = cli.canonical_size {
        config.canonical_width = size;
        config.canonical_height = size;
    }
    if let Some(middle) = cli.middle_cutoff {
        config.cutoffs.middle_aged = middle;
    }
    if let Some(elderly) = cli.elderly_cutoff {
        config.cutoffs.elderly = elderly;
    }
    if let Some(op) = &cli.edge_operator {
        config.edge_operator = op.parse::<EdgeOperator>()?;
    }
    if cli.annotate_dir.is_some() {
        config.annotate = true;
    }

    config.validate()?;
    Ok(config)
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if cli.whole_frame {
        log::info!("Treating each image as a single face");
        return Ok(Box::new(FixedRegionDetector::whole_frame()));
    }
    if !cli.faces.is_empty() {
        log::info!("Using {} fixed face box(es)", cli.faces.len());
        return Ok(Box::new(FixedRegionDetector::new(cli.faces.clone())));
    }

    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();
    Ok(Box::new(OnnxYoloDetector::new(&model_path, cli.confidence)?))
}

/// Inputs play in the given order. Runs of image paths share one image
/// source; each video file gets its own decoder.
fn build_source(inputs: &[PathBuf]) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    let mut sources: Vec<Box<dyn FrameSource>> = Vec::new();
    let mut images: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if is_video(input) {
            if !images.is_empty() {
                sources.push(Box::new(ImageFileSource::new(&std::mem::take(&mut images))?));
            }
            sources.push(open_video(input)?);
        } else {
            images.push(input.clone());
        }
    }
    if !images.is_empty() {
        sources.push(Box::new(ImageFileSource::new(&images)?));
    }
    Ok(Box::new(ChainedFrameSource::new(sources)))
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(feature = "video")]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Ok(Box::new(FfmpegFrameSource::open(path)?))
}

#[cfg(not(feature = "video"))]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    Err(format!(
        "{}: video input needs a build with the `video` feature",
        path.display()
    )
    .into())
}

fn build_executor(workers: Option<usize>) -> Box<dyn FaceAnalysisExecutor> {
    match workers {
        Some(1) => Box::new(SequentialFaceExecutor),
        Some(n) => Box::new(ThreadedFaceExecutor::new(n)),
        None => Box::new(ThreadedFaceExecutor::with_available_parallelism()),
    }
}

fn build_sink(cli: &Cli) -> Result<Box<dyn ReportSink>, Box<dyn std::error::Error>> {
    let json: Box<dyn ReportSink> = match &cli.output {
        Some(path) => Box::new(JsonReportSink::new(BufWriter::new(File::create(path)?))),
        None => Box::new(JsonReportSink::new(io::stdout())),
    };
    match &cli.annotate_dir {
        Some(dir) => Ok(Box::new(CompositeReportSink::new(vec![
            json,
            Box::new(AnnotatedFrameSink::new(
                Box::new(ImageFileWriter::new()),
                dir.clone(),
            )?),
        ]))),
        None => Ok(json),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input not found: {}", input.display()).into());
        }
    }
    if let Some(path) = &cli.config {
        if !path.is_file() {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
    }
    if cli.canonical_size == Some(0) {
        return Err("Canonical size must be positive".into());
    }
    if cli.workers == Some(0) {
        return Err("Workers must be at least 1".into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(op) = &cli.edge_operator {
        op.parse::<EdgeOperator>()?;
    }
    Ok(())
}

fn parse_face_box(s: &str) -> Result<FaceBox, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("Face box must be x,y,width,height, got '{s}'"));
    };
    let num = |v: &str| {
        v.parse::<i32>()
            .map_err(|_| format!("Face box value '{v}' is not an integer"))
    };
    let (w, h) = (num(w)?, num(h)?);
    if w <= 0 || h <= 0 {
        return Err(format!("Face box size must be positive, got {w}x{h}"));
    }
    Ok(FaceBox::new(num(x)?, num(y)?, w, h))
}

fn log_summary(summary: &RunSummary) {
    let categories: Vec<String> = summary
        .categories
        .iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect();
    log::info!(
        "{} face(s) classified across {} frame(s) [{}]",
        summary.faces_classified,
        summary.frames_analyzed,
        categories.join(", ")
    );
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
