//! The per-file metadata record.

use serde::{Deserialize, Serialize};

/// Technical properties of the selected video.
///
/// Created once per selected file with only the facts known up front (name,
/// size, MIME type). Duration, bitrate and resolution start empty and are
/// filled in by [`crate::probe::parse_log_line`] as probe output arrives;
/// [`VideoInfo::apply_probe_fallbacks`] then plugs any gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Display name, the source file name
    pub name: String,
    /// Source size in bytes
    pub size_bytes: u64,
    /// Duration in seconds; zero until known
    pub duration_secs: f64,
    /// Overall bitrate in kbps; zero until known
    pub bitrate_kbps: u64,
    /// `"WIDTH×HEIGHT"` when the probe reported one
    pub resolution: Option<String>,
    /// MIME type of the source
    pub source_mime_type: String,
}

impl VideoInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, size_bytes: u64, source_mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            duration_secs: 0.0,
            bitrate_kbps: 0,
            resolution: None,
            source_mime_type: source_mime_type.into(),
        }
    }

    /// Size in megabytes (`bytes / 1024 / 1024`), the unit predictions use.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        crate::utils::bytes_to_mb(self.size_bytes)
    }

    /// Bitrate in Mbps as used by the quality estimator.
    #[must_use]
    pub fn bitrate_mbps(&self) -> f64 {
        self.bitrate_kbps as f64 / 1000.0
    }

    /// True once a positive duration is known.
    #[must_use]
    pub fn has_duration(&self) -> bool {
        self.duration_secs.is_finite() && self.duration_secs > 0.0
    }

    /// Fills fields the probe left empty.
    ///
    /// A missing duration becomes `fallback_duration_secs`; a missing bitrate
    /// is derived from the file size over that duration.
    pub fn apply_probe_fallbacks(&mut self, fallback_duration_secs: f64) {
        if !self.has_duration() {
            log::warn!(
                "No duration found for {}, assuming {fallback_duration_secs}s",
                self.name
            );
            self.duration_secs = fallback_duration_secs;
        }

        if self.bitrate_kbps == 0 && self.has_duration() {
            let derived = (self.size_bytes as f64 * 8.0) / self.duration_secs / 1000.0;
            self.bitrate_kbps = derived.round() as u64;
            log::debug!("Derived bitrate for {}: {} kbps", self.name, self.bitrate_kbps);
        }
    }
}
