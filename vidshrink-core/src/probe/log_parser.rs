//! Line-oriented scraping of ffmpeg log output.
//!
//! Three facts are recognised independently on every line: the container
//! duration, the overall bitrate and a `WIDTHxHEIGHT` frame size. A line may
//! carry any subset of them; unmatched lines are ignored. Because the probe
//! output can mention several candidates, the last line that matches a field
//! wins for that field.

use crate::media::VideoInfo;
use crate::utils::parse_ffmpeg_time;
use std::sync::LazyLock;
use regex::Regex;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration: (\d{2}:\d{2}:\d{2}\.\d{2})").expect("duration pattern is valid")
});

static BITRATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bitrate:\s+(\d+)\s+kb/s").expect("bitrate pattern is valid"));

// Both dimensions are 3-4 digits and stand alone, so codec tags such as
// `0x31637661` or longer digit runs are not mistaken for a frame size.
static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3,4})x(\d{3,4})\b").expect("resolution pattern is valid"));

static PROGRESS_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time=\s*(\d+:\d{2}:\d{2}(?:\.\d+)?)").expect("time pattern is valid"));

/// Seconds from a `Duration: HH:MM:SS.ff` fragment.
#[must_use]
pub fn parse_duration(line: &str) -> Option<f64> {
    DURATION_RE
        .captures(line)
        .and_then(|caps| parse_ffmpeg_time(&caps[1]))
}

/// kbps from a `bitrate: N kb/s` fragment.
#[must_use]
pub fn parse_bitrate(line: &str) -> Option<u64> {
    BITRATE_RE
        .captures(line)
        .and_then(|caps| caps[1].parse::<u64>().ok())
}

/// `"WIDTH×HEIGHT"` (multiplication sign) from a `WIDTHxHEIGHT` token.
#[must_use]
pub fn parse_resolution(line: &str) -> Option<String> {
    RESOLUTION_RE
        .captures(line)
        .map(|caps| format!("{}×{}", &caps[1], &caps[2]))
}

/// Elapsed encode time from a `time=HH:MM:SS.ff` stats fragment.
#[must_use]
pub fn parse_progress_time(line: &str) -> Option<f64> {
    PROGRESS_TIME_RE
        .captures(line)
        .and_then(|caps| parse_ffmpeg_time(&caps[1]))
}

/// Updates `info` with whatever `line` reveals. Never fails.
///
/// Returns true when at least one field changed.
pub fn parse_log_line(line: &str, info: &mut VideoInfo) -> bool {
    let mut updated = false;

    if let Some(seconds) = parse_duration(line) {
        info.duration_secs = seconds;
        updated = true;
    }

    if let Some(kbps) = parse_bitrate(line) {
        info.bitrate_kbps = kbps;
        updated = true;
    }

    if let Some(resolution) = parse_resolution(line) {
        info.resolution = Some(resolution);
        updated = true;
    }

    if updated {
        log::trace!("Probe line updated metadata: {line}");
    }
    updated
}
