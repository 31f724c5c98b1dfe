//! Implementation of the 'compress' subcommand.
//!
//! Probes the input, shows the estimate and the ffmpeg command, runs the
//! compression with a progress bar and writes `<name>_compressed.mp4`.

use crate::cli::CompressArgs;
use crate::commands::info::print_video_info;
use crate::commands::predict::print_prediction;
use crate::commands::{print_warnings, select_input};
use crate::error::{CliErrorContext, CliResult};
use crate::output::{print_command, print_processing, print_section, print_status, print_success};
use crate::progress::CompressionProgress;

use vidshrink_core::{
    CompressionOutcome, Session, TranscodeEngine, build_compression_args, format_bytes,
    format_command,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// What a compress run produced.
#[derive(Debug)]
pub struct CompressReport {
    /// The ffmpeg command line that was (or would be) run
    pub command: String,
    /// `None` for a dry run
    pub outcome: Option<CompressionOutcome>,
    /// Where the output was written; `None` for a dry run
    pub saved_to: Option<PathBuf>,
}

/// Directory the output is written to when `-o` is not given.
pub fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Runs the compress command against `session`.
pub fn run_compress<E: TranscodeEngine>(
    session: &mut Session<E>,
    args: &CompressArgs,
    show_progress: bool,
) -> CliResult<CompressReport> {
    let request = args.compression.to_request();
    request.validate()?;

    let context = select_input(session, &args.input, show_progress)?;
    print_warnings(context);
    let info = context.info().clone();

    let prediction = session.predict(&request);
    print_video_info(&info);
    print_prediction(&request, prediction.as_ref());

    let compression_args =
        build_compression_args(&request, Some(info.duration_secs), session.config())?;
    let command = format_command(&compression_args);
    print_section("Command");
    print_command(&command);

    if args.dry_run {
        log::info!("Dry run requested; not compressing {}", info.name);
        return Ok(CompressReport {
            command,
            outcome: None,
            saved_to: None,
        });
    }

    print_section("Compression");
    print_processing(&format!("Compressing {}", info.name));
    let started = Instant::now();
    let mut progress = CompressionProgress::new(show_progress);
    let result = session.compress(&request, |fraction| progress.update(fraction));
    progress.finish();
    let outcome = result?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));
    let saved_to = session
        .save_output(&output_dir)
        .cli_with_context(|| format!("Saving output to '{}'", output_dir.display()))?;

    print_success(&format!("Compressed in {:.1}s", started.elapsed().as_secs_f64()));
    print_status("Output", &saved_to.display().to_string(), true);
    print_status(
        "Output size",
        &format!(
            "{:.2} MB ({})",
            outcome.output_bytes as f64 / 1024.0 / 1024.0,
            format_bytes(outcome.output_bytes)
        ),
        false,
    );
    if let Some(change) = outcome.change {
        print_status("Change", &format!("{change:.1}"), false);
    }

    Ok(CompressReport {
        command,
        outcome: Some(outcome),
        saved_to: Some(saved_to),
    })
}
