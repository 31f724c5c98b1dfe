//! Configuration structures and constants for the vidshrink-core library.
//!
//! This module holds the tunables of the size predictor and command builder
//! (the size-neutral quality level, the target-size bitrate floor, the rate
//! control multipliers) together with the settings passed to the engine when
//! it is loaded.

mod builder;

pub use builder::CompressorConfigBuilder;

use crate::error::{CoreError, CoreResult};

// Default constants

/// Quality level considered size-neutral by the quality-mode estimator.
/// At this level the estimated video bitrate equals the source bitrate.
pub const DEFAULT_NEUTRAL_QUALITY: u8 = 23;

/// Quality-level delta that halves (or doubles) the estimated bitrate.
pub const DEFAULT_QUALITY_STEP: f64 = 6.0;

/// Lowest video bitrate (kbps) ever emitted in target-size mode.
pub const DEFAULT_MIN_TARGET_BITRATE_KBPS: f64 = 500.0;

/// Duration assumed when the probe output carried no `Duration:` line.
pub const DEFAULT_PROBE_DURATION_SECS: f64 = 5.0;

/// Files above this size trigger a non-blocking warning (500 MiB).
pub const LARGE_FILE_WARNING_BYTES: u64 = 500 * 1024 * 1024;

pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Encoder speed preset used in quality mode.
pub const DEFAULT_ENCODER_PRESET: &str = "medium";

pub const DEFAULT_QUALITY_LEVEL: u8 = 23;
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 128;
pub const DEFAULT_VIDEO_BITRATE_MBPS: f64 = 2.0;
pub const DEFAULT_TARGET_SIZE_MB: f64 = 50.0;

/// Target-size mode lets peaks reach this multiple of the derived bitrate.
pub const TARGET_SIZE_MAXRATE_FACTOR: f64 = 1.5;

/// Rate-control buffer size as a multiple of the target bitrate.
pub const BUFSIZE_FACTOR: f64 = 2.0;

/// Name of the staged input inside the engine's working directory.
pub const STAGED_INPUT_NAME: &str = "input.mp4";

/// Name of the output the engine writes inside its working directory.
pub const STAGED_OUTPUT_NAME: &str = "output.mp4";

/// Main configuration for prediction and command construction.
///
/// All fields have defaults matching the constants above; the builder is the
/// usual way to override a subset of them.
///
/// ```rust
/// use vidshrink_core::config::CompressorConfigBuilder;
///
/// let config = CompressorConfigBuilder::new()
///     .neutral_quality(23)
///     .quality_step(6.0)
///     .encoder_preset("slow")
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompressorConfig {
    /// Size-neutral quality level for the exponential estimate
    pub neutral_quality: u8,

    /// Quality delta that halves the estimated bitrate
    pub quality_step: f64,

    /// Floor applied to the derived target-size bitrate (kbps)
    pub min_target_bitrate_kbps: f64,

    /// Duration substituted when the probe did not report one
    pub fallback_duration_secs: f64,

    /// Threshold above which a selected file is flagged as large
    pub large_file_threshold_bytes: u64,

    /// Audio encoder passed to `-c:a`
    pub audio_codec: String,

    /// Preset passed to `-preset` in quality mode
    pub encoder_preset: String,

    /// Engine-side name of the staged input
    pub input_name: String,

    /// Engine-side name of the produced output
    pub output_name: String,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            neutral_quality: DEFAULT_NEUTRAL_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            min_target_bitrate_kbps: DEFAULT_MIN_TARGET_BITRATE_KBPS,
            fallback_duration_secs: DEFAULT_PROBE_DURATION_SECS,
            large_file_threshold_bytes: LARGE_FILE_WARNING_BYTES,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            encoder_preset: DEFAULT_ENCODER_PRESET.to_string(),
            input_name: STAGED_INPUT_NAME.to_string(),
            output_name: STAGED_OUTPUT_NAME.to_string(),
        }
    }
}

impl CompressorConfig {
    /// Checks that the numeric tunables are usable and names are present.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.quality_step.is_finite() && self.quality_step > 0.0) {
            return Err(CoreError::Config(format!(
                "quality step must be positive, got {}",
                self.quality_step
            )));
        }
        if !(self.min_target_bitrate_kbps.is_finite() && self.min_target_bitrate_kbps >= 0.0) {
            return Err(CoreError::Config(format!(
                "minimum target bitrate must not be negative, got {}",
                self.min_target_bitrate_kbps
            )));
        }
        if !(self.fallback_duration_secs.is_finite() && self.fallback_duration_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "fallback duration must be positive, got {}",
                self.fallback_duration_secs
            )));
        }
        for (label, value) in [
            ("audio codec", &self.audio_codec),
            ("encoder preset", &self.encoder_preset),
            ("input name", &self.input_name),
            ("output name", &self.output_name),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Config(format!("{label} must not be empty")));
            }
        }
        if self.input_name == self.output_name {
            return Err(CoreError::Config(
                "input and output names must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings handed to [`crate::engine::TranscodeEngine::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Download a static ffmpeg build when none is installed
    pub auto_download: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CompressorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.neutral_quality, 23);
        assert_eq!(config.quality_step, 6.0);
        assert_eq!(config.min_target_bitrate_kbps, 500.0);
        assert_eq!(config.fallback_duration_secs, 5.0);
        assert_eq!(config.large_file_threshold_bytes, 524_288_000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CompressorConfig::default();
        config.quality_step = 0.0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = CompressorConfig::default();
        config.fallback_duration_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = CompressorConfig::default();
        config.audio_codec = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CompressorConfig::default();
        config.output_name = config.input_name.clone();
        assert!(config.validate().is_err());
    }
}
