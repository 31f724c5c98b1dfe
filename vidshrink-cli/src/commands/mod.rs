//! Command implementations for the CLI.
//!
//! Each command drives a [`Session`] that the caller has already created, so
//! the same code runs against ffmpeg in the binary and a scripted engine in
//! tests.

pub mod compress;
pub mod info;
pub mod predict;

use crate::error::CliResult;
use crate::output;
use crate::progress::start_spinner;

use vidshrink_core::{
    CompressorConfig, CoreError, EngineConfig, EngineLoader, MediaContext, Session, SidecarEngine,
    TranscodeEngine,
};

use std::path::Path;

/// Starts loading ffmpeg in the background and wraps it in a session.
pub fn open_session(engine_config: EngineConfig) -> CliResult<Session<SidecarEngine>> {
    let signal = EngineLoader::spawn(SidecarEngine::new(), engine_config);
    Session::new(CompressorConfig::default(), signal)
}

/// Selects and probes `input`, showing a spinner while ffmpeg works.
pub fn select_input<'s, E: TranscodeEngine>(
    session: &'s mut Session<E>,
    input: &Path,
    show_progress: bool,
) -> CliResult<&'s MediaContext> {
    let spinner = start_spinner(&format!("Probing {}", input.display()), show_progress);
    let result = session.select_file(input);
    spinner.finish_and_clear();
    result
}

/// Prints the non-blocking warnings attached to a selection.
pub fn print_warnings(context: &MediaContext) {
    for warning in context.warnings() {
        output::print_warning(&warning.to_string());
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json(value: &serde_json::Value) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::OperationFailed(format!("Rendering JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}
