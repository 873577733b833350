//! Wrinkle-density age bracket estimation.
//!
//! Each detected face is resampled to a canonical crop, a fixed set of skin
//! regions is edge-scored, and the mean edge density picks one of three age
//! brackets. Detection, frame acquisition and reporting sit behind traits so
//! the analysis runs on synthetic inputs as readily as on real footage.

pub mod analysis {
    pub mod domain {
        pub mod age_classifier;
        pub mod analysis_config;
        pub mod analysis_error;
        pub mod edge_detector;
        pub mod edge_map;
        pub mod edge_scorer;
        pub mod face_analyzer;
        pub mod face_region;
        pub mod normalizer;
        pub mod wrinkle_aggregator;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod analyze_frame_use_case;
    pub mod face_analysis_executor;
    pub mod pipeline_logger;
    pub mod process_source_use_case;
    pub mod infrastructure {
        pub mod threaded_face_executor;
    }
}

pub mod reporting {
    pub mod domain {
        pub mod frame_report;
        pub mod report_sink;
    }
    pub mod infrastructure {
        pub mod annotated_frame_sink;
        pub mod composite_report_sink;
        pub mod json_report_sink;
    }
}

pub mod shared {
    pub mod constants;
    pub mod face_box;
    pub mod frame;
    pub mod roi_rect;
}

pub mod video {
    pub mod domain {
        pub mod frame_source;
        pub mod image_writer;
    }
    pub mod infrastructure {
        pub mod chained_frame_source;
        #[cfg(feature = "video")]
        pub mod ffmpeg_frame_source;
        pub mod image_file_source;
        pub mod image_file_writer;
    }
}
