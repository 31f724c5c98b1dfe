// ============================================================================
// vidshrink-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: env_logger setup for the CLI
//
// The core library logs through the `log` facade. The CLI installs
// `env_logger` as the backend, writing to stderr so stdout stays clean for
// reports and --json output.
//
// USAGE:
// - default: warnings and errors only
// - --verbose: debug output, including raw ffmpeg lines (target "ffmpeg_log")
// - RUST_LOG overrides both, e.g. RUST_LOG=vidshrink_core=trace

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default level for the given verbosity.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let default = default_level(verbose).to_string().to_lowercase();
    let _ = Builder::from_env(Env::default().default_filter_or(default))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                get_timestamp(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
