// vidshrink-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vidshrink_core::config::{
    DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_QUALITY_LEVEL, DEFAULT_TARGET_SIZE_MB,
    DEFAULT_VIDEO_BITRATE_MBPS, DEFAULT_VIDEO_CODEC,
};
use vidshrink_core::{CompressionMode, CompressionRequest, FrameRateChoice, ResolutionChoice};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidshrink: Predict and compress video file sizes",
    long_about = "Probes a video with ffmpeg, estimates the compressed size for a chosen \
                  strategy, and compresses it to an MP4 next to the original or in a chosen directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging, including raw ffmpeg output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Download a static ffmpeg build when none is installed
    #[arg(long, global = true, env = "VIDSHRINK_AUTO_DOWNLOAD")]
    pub auto_download: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe a video and show its duration, bitrate and resolution
    Info(InfoArgs),
    /// Estimate the compressed size without running the encoder
    Predict(PredictArgs),
    /// Compress a video and write <name>_compressed.mp4
    Compress(CompressArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Video file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Print machine-readable JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Video file to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub compression: CompressionArgs,

    /// Print machine-readable JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Video file to compress
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub compression: CompressionArgs,

    /// Directory for the compressed file (defaults to the input's directory)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Show the prediction and ffmpeg command without compressing
    #[arg(long)]
    pub dry_run: bool,
}

/// Compression strategy selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Constant quality (CRF)
    Quality,
    /// Fixed video bitrate
    Bitrate,
    /// Fit the output into a size budget
    TargetSize,
}

#[derive(Args, Debug, Clone)]
pub struct CompressionArgs {
    /// Compression strategy
    #[arg(long, value_enum, default_value_t = ModeArg::Quality)]
    pub mode: ModeArg,

    /// Quality level for quality mode (lower is better and larger)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value_t = DEFAULT_QUALITY_LEVEL,
        value_parser = clap::value_parser!(u8).range(0..=51)
    )]
    pub quality: u8,

    /// Video bitrate in Mbps for bitrate mode
    #[arg(long, value_name = "MBPS", default_value_t = DEFAULT_VIDEO_BITRATE_MBPS)]
    pub bitrate: f64,

    /// Output size in MB for target-size mode
    #[arg(long = "target-size", value_name = "MB", default_value_t = DEFAULT_TARGET_SIZE_MB)]
    pub target_size: f64,

    /// Video encoder passed to ffmpeg
    #[arg(long, value_name = "CODEC", env = "VIDSHRINK_CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub codec: String,

    /// Output resolution as WIDTHxHEIGHT, or "original"
    #[arg(long, value_name = "WxH", default_value = "original")]
    pub resolution: ResolutionChoice,

    /// Output frame rate, or "original"
    #[arg(long, value_name = "FPS", default_value = "original")]
    pub fps: FrameRateChoice,

    /// Audio bitrate in kbps
    #[arg(
        long = "audio-bitrate",
        value_name = "KBPS",
        default_value_t = DEFAULT_AUDIO_BITRATE_KBPS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub audio_bitrate: u32,
}

impl CompressionArgs {
    /// The request these options describe. Only the selected mode's value is used.
    pub fn to_request(&self) -> CompressionRequest {
        let mode = match self.mode {
            ModeArg::Quality => CompressionMode::Quality {
                level: self.quality,
            },
            ModeArg::Bitrate => CompressionMode::Bitrate {
                video_mbps: self.bitrate,
            },
            ModeArg::TargetSize => CompressionMode::TargetSize {
                megabytes: self.target_size,
            },
        };
        CompressionRequest {
            mode,
            codec: self.codec.clone(),
            resolution: self.resolution,
            frame_rate: self.fps,
            audio_bitrate_kbps: self.audio_bitrate,
        }
    }
}
