//! Error types for vidshrink-core.
//!
//! Every fallible operation in the crate returns [`CoreResult`]. The session
//! converts engine failures into these variants so callers only ever see a
//! `CoreError` to render, never a panic.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Transcoding engine is not loaded")]
    EngineNotLoaded,

    #[error("Failed to load transcoding engine: {0}")]
    EngineLoad(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Engine execution failed: {0}")]
    EngineExec(String),

    #[error("Not a video file: {0}")]
    NotAVideo(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid compression request: {0}")]
    InvalidRequest(String),

    #[error("Video duration is unknown")]
    DurationUnknown,

    #[error("No file has been selected")]
    NoFileSelected,

    #[error("No compressed output is available")]
    NoOutput,

    #[error("Engine file '{0}' not found")]
    EngineFileNotFound(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn command_start_error(cmd: &str, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.to_string(), err)
}

pub(crate) fn command_wait_error(cmd: &str, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.to_string(), err)
}

pub(crate) fn command_failed_error(
    cmd: &str,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.to_string(), status, stderr.into())
}
