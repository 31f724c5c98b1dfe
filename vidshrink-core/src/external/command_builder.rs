//! FFmpeg argument construction for compression runs.
//!
//! The argument order is fixed: input, video encoding, optional scale
//! filter, optional frame rate, audio, fast-start, output. ffmpeg lets later
//! flags override earlier ones for the same purpose, so the order is part of
//! the contract with the engine.

use crate::config::{BUFSIZE_FACTOR, CompressorConfig, TARGET_SIZE_MAXRATE_FACTOR};
use crate::error::{CoreError, CoreResult};
use crate::request::{CompressionMode, CompressionRequest, FrameRateChoice, ResolutionChoice};

/// Builder for constructing video filter chains
#[derive(Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scale filter unless the original size is kept
    #[must_use]
    pub fn add_scale(mut self, resolution: ResolutionChoice) -> Self {
        if let ResolutionChoice::Scale { width, height } = resolution {
            self.filters.push(format!("scale={width}x{height}"));
        }
        self
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Video bitrate (kbps) that fits `target_mb` into `duration_secs`.
///
/// The audio share is subtracted and the result never drops below
/// `floor_kbps`, so very tight targets or very long inputs still get a
/// usable rate.
pub fn target_bitrate_kbps(
    target_mb: f64,
    duration_secs: f64,
    audio_bitrate_kbps: u32,
    floor_kbps: f64,
) -> CoreResult<f64> {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return Err(CoreError::DurationUnknown);
    }
    let nominal = (target_mb * 8.0 * 1024.0) / duration_secs - f64::from(audio_bitrate_kbps);
    Ok(nominal.max(floor_kbps))
}

/// Assembles the argument vector for one compression run.
pub struct CompressionCommandBuilder<'a> {
    request: &'a CompressionRequest,
    config: &'a CompressorConfig,
    duration_secs: Option<f64>,
    args: Vec<String>,
}

impl<'a> CompressionCommandBuilder<'a> {
    #[must_use]
    pub fn new(request: &'a CompressionRequest, config: &'a CompressorConfig) -> Self {
        Self {
            request,
            config,
            duration_secs: None,
            args: Vec::new(),
        }
    }

    /// Supplies the probed duration; required for target-size mode.
    #[must_use]
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    fn push(&mut self, flag: &str, value: impl Into<String>) {
        self.args.push(flag.to_string());
        self.args.push(value.into());
    }

    fn push_video_args(&mut self) -> CoreResult<()> {
        let codec = self.request.codec.clone();
        self.push("-c:v", codec);

        match self.request.mode {
            CompressionMode::Quality { level } => {
                self.push("-crf", level.to_string());
                let preset = self.config.encoder_preset.clone();
                self.push("-preset", preset);
            }
            CompressionMode::Bitrate { video_mbps } => {
                let rate = format!("{video_mbps}M");
                self.push("-b:v", rate.clone());
                self.push("-maxrate", rate);
                self.push("-bufsize", format!("{}M", video_mbps * BUFSIZE_FACTOR));
            }
            CompressionMode::TargetSize { megabytes } => {
                let duration = self.duration_secs.ok_or(CoreError::DurationUnknown)?;
                let kbps = target_bitrate_kbps(
                    megabytes,
                    duration,
                    self.request.audio_bitrate_kbps,
                    self.config.min_target_bitrate_kbps,
                )?;
                log::debug!("Target size {megabytes} MB over {duration}s -> {kbps:.0} kbps video");
                self.push("-b:v", format!("{}k", kbps.round()));
                self.push(
                    "-maxrate",
                    format!("{}k", (kbps * TARGET_SIZE_MAXRATE_FACTOR).round()),
                );
                self.push("-bufsize", format!("{}k", (kbps * BUFSIZE_FACTOR).round()));
            }
        }
        Ok(())
    }

    /// Produces the ordered argument vector.
    pub fn build(mut self) -> CoreResult<Vec<String>> {
        self.request.validate()?;

        let input = self.config.input_name.clone();
        self.push("-i", input);

        self.push_video_args()?;

        if let Some(filters) = VideoFilterChain::new()
            .add_scale(self.request.resolution)
            .build()
        {
            self.push("-vf", filters);
        }

        if let FrameRateChoice::Fps(fps) = self.request.frame_rate {
            self.push("-r", fps.to_string());
        }

        let audio_codec = self.config.audio_codec.clone();
        self.push("-c:a", audio_codec);
        self.push("-b:a", format!("{}k", self.request.audio_bitrate_kbps));

        self.push("-movflags", "+faststart");

        self.args.push(self.config.output_name.clone());
        Ok(self.args)
    }
}

/// Builds the compression arguments for `request`.
///
/// `duration_secs` is the probed duration; it is only consulted in
/// target-size mode, where a missing or non-positive value is an error.
pub fn build_compression_args(
    request: &CompressionRequest,
    duration_secs: Option<f64>,
    config: &CompressorConfig,
) -> CoreResult<Vec<String>> {
    let mut builder = CompressionCommandBuilder::new(request, config);
    if let Some(duration) = duration_secs {
        builder = builder.with_duration(duration);
    }
    builder.build()
}

/// Renders arguments as a copy-pasteable `ffmpeg` command line.
#[must_use]
pub fn format_command(args: &[String]) -> String {
    let mut rendered = String::from("ffmpeg");
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains([' ', '\'', '"']) {
            rendered.push('\'');
            rendered.push_str(&arg.replace('\'', r"'\''"));
            rendered.push('\'');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
