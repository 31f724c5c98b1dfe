//! Closed-form output size estimation.
//!
//! Predictions never run the engine. Each mode reduces to a video bitrate
//! (given, derived from the source bitrate, or implied by a size target) that
//! is combined with the audio bitrate over the known duration.

use crate::config::CompressorConfig;
use crate::media::VideoInfo;
use crate::request::{CompressionMode, CompressionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction and magnitude of a size change, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum SizeChange {
    /// Output is smaller than the source.
    Reduction(f64),
    /// Output is the same size or larger; the value is the absolute growth.
    Increase(f64),
}

impl SizeChange {
    /// Classifies a signed change where positive means smaller output.
    #[must_use]
    pub fn from_signed_percent(percent: f64) -> Self {
        if percent > 0.0 {
            Self::Reduction(percent)
        } else {
            Self::Increase(percent.abs())
        }
    }

    /// Change between an original and a new size in the same unit.
    ///
    /// Returns `None` when the original size is zero.
    #[must_use]
    pub fn between(original: f64, new: f64) -> Option<Self> {
        if original <= 0.0 || !original.is_finite() || !new.is_finite() {
            return None;
        }
        Some(Self::from_signed_percent((1.0 - new / original) * 100.0))
    }

    /// Unsigned percentage.
    #[must_use]
    pub fn percent(&self) -> f64 {
        match self {
            Self::Reduction(p) | Self::Increase(p) => *p,
        }
    }

    /// Signed percentage, positive for a reduction.
    #[must_use]
    pub fn signed_percent(&self) -> f64 {
        match self {
            Self::Reduction(p) => *p,
            Self::Increase(p) => -*p,
        }
    }

    #[must_use]
    pub fn is_reduction(&self) -> bool {
        matches!(self, Self::Reduction(_))
    }
}

impl fmt::Display for SizeChange {
    /// Whole percent by default; honours an explicit precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(0);
        match self {
            Self::Reduction(p) => write!(f, "reduction of about {p:.precision$}%"),
            Self::Increase(p) => write!(f, "increase of about {p:.precision$}%"),
        }
    }
}

/// An estimated output size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizePrediction {
    pub predicted_mb: f64,
    pub change: SizeChange,
}

/// Estimated video bitrate (Mbps) for a quality level.
///
/// Exponential falloff around the size-neutral level: every `quality_step`
/// above it halves the source bitrate, every step below doubles it.
#[must_use]
pub fn estimate_quality_bitrate_mbps(
    original_bitrate_mbps: f64,
    quality_level: u8,
    config: &CompressorConfig,
) -> f64 {
    let delta = f64::from(quality_level) - f64::from(config.neutral_quality);
    original_bitrate_mbps * 0.5_f64.powf(delta / config.quality_step)
}

/// Size in MB of `video_mbps + audio_mbps` sustained for `duration_secs`.
#[must_use]
pub fn size_from_bitrates_mb(video_mbps: f64, audio_mbps: f64, duration_secs: f64) -> f64 {
    (video_mbps + audio_mbps) * duration_secs / 8.0
}

/// Predicts the output size of `request` applied to `info`.
///
/// Returns `None` while the duration is unknown, or when the source size is
/// zero, rather than producing a misleading number.
#[must_use]
pub fn predict_size(
    info: &VideoInfo,
    request: &CompressionRequest,
    config: &CompressorConfig,
) -> Option<SizePrediction> {
    if !info.has_duration() {
        log::debug!("Skipping prediction for {}: duration unknown", info.name);
        return None;
    }

    let audio_mbps = request.audio_bitrate_mbps();
    let predicted_mb = match request.mode {
        CompressionMode::TargetSize { megabytes } => megabytes,
        CompressionMode::Bitrate { video_mbps } => {
            size_from_bitrates_mb(video_mbps, audio_mbps, info.duration_secs)
        }
        CompressionMode::Quality { level } => {
            let video_mbps = estimate_quality_bitrate_mbps(info.bitrate_mbps(), level, config);
            size_from_bitrates_mb(video_mbps, audio_mbps, info.duration_secs)
        }
    };

    let change = SizeChange::between(info.size_mb(), predicted_mb)?;
    log::debug!(
        "Predicted {:.2} MB for {} ({} mode)",
        predicted_mb,
        info.name,
        request.mode.label()
    );
    Some(SizePrediction {
        predicted_mb,
        change,
    })
}
