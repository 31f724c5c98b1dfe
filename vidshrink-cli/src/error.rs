// ============================================================================
// vidshrink-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reports every failure as a vidshrink-core CoreError. This module
// adds a context extension so command code can say what it was doing when a
// lower-level error surfaced.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: names the step a lower-level error came from
// - suggestion_for: one-line hints printed under an error

// ---- Internal crate imports ----
use vidshrink_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Prefixes a failing result with the step that produced it.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

/// A one-line hint for errors the user can act on.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::EngineLoad(_) => {
            Some("Install ffmpeg or rerun with --auto-download to fetch a static build.")
        }
        CoreError::NotAVideo(_) => Some("Choose a file with a video extension such as .mp4, .mov or .mkv."),
        CoreError::DurationUnknown => {
            Some("The video's duration could not be read; try quality or bitrate mode.")
        }
        CoreError::CommandFailed(..) | CoreError::EngineExec(_) => {
            Some("Rerun with --verbose to see the full ffmpeg output.")
        }
        _ => None,
    }
}
