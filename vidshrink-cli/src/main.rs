// ============================================================================
// vidshrink-cli/src/main.rs
// ============================================================================
//
// VIDSHRINK CLI: Main Entry Point
//
// Parses arguments, sets up logging and color, starts loading ffmpeg in the
// background and dispatches to the selected command. Any error is printed
// with a suggestion where one applies and the process exits with status 1.

use clap::Parser;
use vidshrink_cli::commands::open_session;
use vidshrink_cli::error::suggestion_for;
use vidshrink_cli::logging::init_logging;
use vidshrink_cli::output;
use vidshrink_cli::progress::progress_visible;
use vidshrink_cli::{Cli, CliResult, Commands, run_compress, run_info, run_predict};
use vidshrink_core::EngineConfig;

use std::process;

fn run(cli: Cli) -> CliResult<()> {
    let engine_config = EngineConfig {
        auto_download: cli.auto_download,
    };
    let mut session = open_session(engine_config)?;

    match cli.command {
        Commands::Info(args) => {
            let show_progress = progress_visible(args.json);
            run_info(&mut session, &args, show_progress).map(|_| ())
        }
        Commands::Predict(args) => {
            let show_progress = progress_visible(args.json);
            run_predict(&mut session, &args, show_progress).map(|_| ())
        }
        Commands::Compress(args) => {
            let show_progress = progress_visible(false);
            run_compress(&mut session, &args, show_progress).map(|_| ())
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    output::set_color(!cli.no_color && console::colors_enabled());
    log::debug!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        log::debug!("Command failed: {e:?}");
        output::print_error("Error", &e.to_string(), suggestion_for(&e));
        process::exit(1);
    }
}
