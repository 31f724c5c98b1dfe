//! Implementation of the 'info' subcommand.

use crate::cli::InfoArgs;
use crate::commands::{print_json, print_warnings, select_input};
use crate::error::CliResult;
use crate::output::{print_section, print_status};

use vidshrink_core::{Session, TranscodeEngine, VideoInfo, format_bytes, format_duration};

/// Probes the input and prints its metadata.
pub fn run_info<E: TranscodeEngine>(
    session: &mut Session<E>,
    args: &InfoArgs,
    show_progress: bool,
) -> CliResult<VideoInfo> {
    let context = select_input(session, &args.input, show_progress && !args.json)?;
    let info = context.info().clone();

    if args.json {
        let warnings: Vec<String> = context.warnings().iter().map(ToString::to_string).collect();
        let report = serde_json::json!({
            "info": &info,
            "size_mb": info.size_mb(),
            "bitrate_mbps": info.bitrate_mbps(),
            "warnings": warnings,
        });
        print_json(&report)?;
        return Ok(info);
    }

    print_warnings(context);
    print_video_info(&info);
    Ok(info)
}

/// Prints the "Video" section shared by every command.
pub fn print_video_info(info: &VideoInfo) {
    print_section("Video");
    print_status("Name", &info.name, true);
    print_status(
        "Size",
        &format!("{:.2} MB ({})", info.size_mb(), format_bytes(info.size_bytes)),
        false,
    );
    print_status(
        "Duration",
        &format!("{} ({:.2} s)", format_duration(info.duration_secs), info.duration_secs),
        false,
    );
    print_status(
        "Bitrate",
        &format!("{} kbps ({:.2} Mbps)", info.bitrate_kbps, info.bitrate_mbps()),
        false,
    );
    print_status(
        "Resolution",
        info.resolution.as_deref().unwrap_or("unknown"),
        false,
    );
    print_status("Type", &info.source_mime_type, false);
}
