//! Core library for predicting and performing single-file video compression
//! with ffmpeg.
//!
//! This crate validates an input file, probes its duration, bitrate and
//! resolution from ffmpeg's log output, estimates the compressed size for a
//! requested mode, and runs the compression through a [`TranscodeEngine`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidshrink_core::{
//!     CompressionMode, CompressionRequest, CompressorConfig, EngineConfig, EngineLoader,
//!     Session, SidecarEngine,
//! };
//! use std::path::Path;
//!
//! let signal = EngineLoader::spawn(SidecarEngine::new(), EngineConfig::default());
//! let mut session = Session::new(CompressorConfig::default(), signal).unwrap();
//!
//! session.select_file(Path::new("/videos/holiday.mov")).unwrap();
//!
//! let request = CompressionRequest::new(CompressionMode::TargetSize { megabytes: 25.0 });
//! if let Some(prediction) = session.predict(&request) {
//!     println!("~{:.2} MB ({})", prediction.predicted_mb, prediction.change);
//! }
//!
//! session.compress(&request, |fraction| println!("{:.0}%", fraction * 100.0)).unwrap();
//! session.save_output(Path::new("/videos/out")).unwrap();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod external;
pub mod media;
pub mod prediction;
pub mod probe;
pub mod request;
pub mod session;
pub mod utils;

// Re-exports for public API
pub use config::{CompressorConfig, CompressorConfigBuilder, EngineConfig};
pub use engine::{EngineEvent, EngineLoader, ReadySignal, SidecarEngine, TranscodeEngine};
pub use error::{CoreError, CoreResult};
pub use external::{build_compression_args, format_command};
pub use media::{FileSelection, FileWarning, VideoInfo, select_video_file};
pub use prediction::{SizeChange, SizePrediction, predict_size};
pub use request::{CompressionMode, CompressionRequest, FrameRateChoice, ResolutionChoice};
pub use session::{CompressionOutcome, MediaContext, Session, SessionState};
pub use utils::{compressed_file_name, format_bytes, format_duration, parse_ffmpeg_time};
