//! Extraction of metadata from the engine's diagnostic output.
//!
//! The engine is run once with only an input argument; it prints the
//! container and stream summary to its log and exits with an error because
//! no output was named. Each log line is fed through [`parse_log_line`].

pub mod log_parser;

pub use log_parser::{parse_bitrate, parse_duration, parse_log_line, parse_progress_time, parse_resolution};

/// Builds the argument vector for a metadata probe of `input_name`.
#[must_use]
pub fn probe_args(input_name: &str) -> Vec<String> {
    vec!["-i".to_string(), input_name.to_string()]
}
