// vidshrink-cli/src/lib.rs
//
// Library portion of the vidshrink CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, CompressArgs, CompressionArgs, InfoArgs, ModeArg, PredictArgs};
pub use commands::compress::run_compress;
pub use commands::info::run_info;
pub use commands::predict::run_predict;
pub use error::{CliErrorContext, CliResult};
