//! The user's compression choices.
//!
//! A [`CompressionRequest`] is built fresh for every prediction update and
//! every compression. The strategy lives in [`CompressionMode`], which carries
//! exactly the one parameter that strategy uses.

use crate::config::{
    DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_QUALITY_LEVEL, DEFAULT_VIDEO_CODEC,
};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compression strategy with its active parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompressionMode {
    /// Constant quality; lower level means higher quality and a larger file.
    Quality { level: u8 },
    /// Fixed video bitrate in Mbps.
    Bitrate { video_mbps: f64 },
    /// Desired output size in MB; the bitrate is derived from it.
    TargetSize { megabytes: f64 },
}

impl CompressionMode {
    /// Short name used in logs and output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quality { .. } => "quality",
            Self::Bitrate { .. } => "bitrate",
            Self::TargetSize { .. } => "target-size",
        }
    }
}

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionChoice {
    Original,
    Scale { width: u32, height: u32 },
}

impl FromStr for ResolutionChoice {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if is_keep_original(s) {
            return Ok(Self::Original);
        }
        let (w, h) = s
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| CoreError::InvalidRequest(format!("resolution '{s}' is not WIDTHxHEIGHT")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CoreError::InvalidRequest(format!("invalid dimension '{v}' in '{s}'")))
        };
        Ok(Self::Scale {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

impl fmt::Display for ResolutionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Scale { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// Output frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrameRateChoice {
    Original,
    Fps(f64),
}

impl FromStr for FrameRateChoice {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if is_keep_original(s) {
            return Ok(Self::Original);
        }
        s.parse::<f64>()
            .ok()
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(Self::Fps)
            .ok_or_else(|| CoreError::InvalidRequest(format!("invalid frame rate '{s}'")))
    }
}

impl fmt::Display for FrameRateChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Fps(fps) => write!(f, "{fps}"),
        }
    }
}

/// Accepts `original`, `keep` and `keep original` in any case.
fn is_keep_original(s: &str) -> bool {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();
    matches!(normalized.as_str(), "original" | "keep" | "keep original")
}

/// Everything the predictor and command builder need from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionRequest {
    pub mode: CompressionMode,
    /// Video encoder passed to `-c:v`
    pub codec: String,
    pub resolution: ResolutionChoice,
    pub frame_rate: FrameRateChoice,
    /// Audio bitrate in kbps, used by every mode
    pub audio_bitrate_kbps: u32,
}

impl Default for CompressionRequest {
    fn default() -> Self {
        Self {
            mode: CompressionMode::Quality {
                level: DEFAULT_QUALITY_LEVEL,
            },
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            resolution: ResolutionChoice::Original,
            frame_rate: FrameRateChoice::Original,
            audio_bitrate_kbps: DEFAULT_AUDIO_BITRATE_KBPS,
        }
    }
}

impl CompressionRequest {
    #[must_use]
    pub fn new(mode: CompressionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Audio bitrate in Mbps, the unit the size formulas combine with video.
    #[must_use]
    pub fn audio_bitrate_mbps(&self) -> f64 {
        f64::from(self.audio_bitrate_kbps) / 1000.0
    }

    /// Rejects requests whose numbers cannot produce a sensible encode.
    pub fn validate(&self) -> CoreResult<()> {
        match self.mode {
            CompressionMode::Quality { .. } => {}
            CompressionMode::Bitrate { video_mbps } => {
                if !(video_mbps.is_finite() && video_mbps > 0.0) {
                    return Err(CoreError::InvalidRequest(format!(
                        "video bitrate must be positive, got {video_mbps}"
                    )));
                }
            }
            CompressionMode::TargetSize { megabytes } => {
                if !(megabytes.is_finite() && megabytes > 0.0) {
                    return Err(CoreError::InvalidRequest(format!(
                        "target size must be positive, got {megabytes}"
                    )));
                }
            }
        }
        if self.codec.trim().is_empty() {
            return Err(CoreError::InvalidRequest("codec must not be empty".to_string()));
        }
        if self.audio_bitrate_kbps == 0 {
            return Err(CoreError::InvalidRequest(
                "audio bitrate must be positive".to_string(),
            ));
        }
        if let FrameRateChoice::Fps(fps) = self.frame_rate {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(CoreError::InvalidRequest(format!("invalid frame rate {fps}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution_choice() {
        assert_eq!("original".parse::<ResolutionChoice>().unwrap(), ResolutionChoice::Original);
        assert_eq!("Keep".parse::<ResolutionChoice>().unwrap(), ResolutionChoice::Original);
        assert_eq!(
            "1280x720".parse::<ResolutionChoice>().unwrap(),
            ResolutionChoice::Scale { width: 1280, height: 720 }
        );
        assert_eq!(
            "1920×1080".parse::<ResolutionChoice>().unwrap(),
            ResolutionChoice::Scale { width: 1920, height: 1080 }
        );
        assert_eq!(
            "keep original".parse::<ResolutionChoice>().unwrap(),
            ResolutionChoice::Original
        );
        assert!("1280".parse::<ResolutionChoice>().is_err());
        assert!("0x720".parse::<ResolutionChoice>().is_err());
    }

    #[test]
    fn test_parse_frame_rate_choice() {
        assert_eq!("original".parse::<FrameRateChoice>().unwrap(), FrameRateChoice::Original);
        assert_eq!("30".parse::<FrameRateChoice>().unwrap(), FrameRateChoice::Fps(30.0));
        assert_eq!("29.97".parse::<FrameRateChoice>().unwrap(), FrameRateChoice::Fps(29.97));
        assert_eq!(
            "Keep  Original".parse::<FrameRateChoice>().unwrap(),
            FrameRateChoice::Original
        );
        assert!("-5".parse::<FrameRateChoice>().is_err());
        assert!("fast".parse::<FrameRateChoice>().is_err());
    }

    #[test]
    fn test_resolution_display_round_trips_to_filter_form() {
        let choice = ResolutionChoice::Scale { width: 854, height: 480 };
        assert_eq!(choice.to_string(), "854x480");
    }

    #[test]
    fn test_validate() {
        assert!(CompressionRequest::default().validate().is_ok());
        assert!(CompressionRequest::new(CompressionMode::Bitrate { video_mbps: 0.0 })
            .validate()
            .is_err());
        assert!(CompressionRequest::new(CompressionMode::TargetSize { megabytes: f64::NAN })
            .validate()
            .is_err());

        let mut request = CompressionRequest::default();
        request.audio_bitrate_kbps = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_audio_bitrate_mbps() {
        let request = CompressionRequest::default();
        assert_eq!(request.audio_bitrate_mbps(), 0.128);
    }

    #[test]
    fn test_request_serializes_with_mode_tag() {
        let request = CompressionRequest::new(CompressionMode::TargetSize { megabytes: 25.0 });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mode"]["mode"], "target_size");
        assert_eq!(json["mode"]["megabytes"], 25.0);
        assert_eq!(json["audio_bitrate_kbps"], 128);

        let back: CompressionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }
}
