// ============================================================================
// vidshrink-core/src/engine/sidecar.rs
// ============================================================================
//
// FFMPEG ENGINE: TranscodeEngine backed by an ffmpeg process
//
// The engine's "filesystem" is a private temporary directory; every command
// runs with that directory as its working directory, so argument vectors
// refer to staged files by bare name. ffmpeg writes its diagnostics and
// stats to stderr, with stats lines terminated by '\r', so stderr is split on
// both '\r' and '\n' before lines are handed out.

use super::{EngineEvent, TranscodeEngine};
use crate::config::EngineConfig;
use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use crate::external::format_command;
use crate::probe::{parse_duration, parse_progress_time};
use ffmpeg_sidecar::command::{FfmpegCommand, ffmpeg_is_installed};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempDirBuilder, TempDir};

/// Number of trailing stderr lines kept for error reports.
const STDERR_TAIL_LINES: usize = 20;

/// Turns ffmpeg's `Duration:` and `time=` lines into completion fractions.
#[derive(Debug, Default)]
struct ProgressTracker {
    duration_secs: Option<f64>,
}

impl ProgressTracker {
    fn observe(&mut self, line: &str) -> Option<f64> {
        if self.duration_secs.is_none() {
            if let Some(duration) = parse_duration(line).filter(|d| *d > 0.0) {
                self.duration_secs = Some(duration);
                return None;
            }
        }
        let duration = self.duration_secs?;
        let elapsed = parse_progress_time(line)?;
        Some((elapsed / duration).clamp(0.0, 1.0))
    }
}

/// Splits ffmpeg's stderr into lines, emitting progress and log events.
///
/// The last [`STDERR_TAIL_LINES`] lines are kept in `tail`. A read error
/// stops forwarding and is returned as is.
fn forward_stderr<R, F>(reader: R, tail: &mut VecDeque<String>, handler: &mut F) -> std::io::Result<()>
where
    R: BufRead,
    F: FnMut(EngineEvent),
{
    let mut tracker = ProgressTracker::default();
    for chunk in reader.split(b'\r') {
        let chunk = chunk?;
        for line in String::from_utf8_lossy(&chunk).lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if let Some(fraction) = tracker.observe(line) {
                handler(EngineEvent::Progress(fraction));
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
            handler(EngineEvent::Log(line.to_string()));
        }
    }
    Ok(())
}

/// ffmpeg run through `ffmpeg-sidecar` in a private working directory.
#[derive(Debug, Default)]
pub struct SidecarEngine {
    workdir: Option<TempDir>,
}

impl SidecarEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn workdir(&self) -> CoreResult<&Path> {
        self.workdir
            .as_ref()
            .map(TempDir::path)
            .ok_or(CoreError::EngineNotLoaded)
    }

    /// Resolves an engine file name to its host path.
    fn resolve(&self, name: &str) -> CoreResult<PathBuf> {
        let is_bare = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !is_bare {
            return Err(CoreError::PathError(format!(
                "engine file name '{name}' must be a bare file name"
            )));
        }
        Ok(self.workdir()?.join(name))
    }
}

impl TranscodeEngine for SidecarEngine {
    fn load(&mut self, config: &EngineConfig) -> CoreResult<()> {
        if self.workdir.is_some() {
            return Ok(());
        }

        if !ffmpeg_is_installed() {
            if config.auto_download {
                log::info!("ffmpeg not found, downloading a static build");
                ffmpeg_sidecar::download::auto_download()
                    .map_err(|e| CoreError::EngineLoad(e.to_string()))?;
            } else {
                return Err(CoreError::EngineLoad(
                    "ffmpeg was not found; install it or enable automatic download".to_string(),
                ));
            }
        }

        let workdir = TempDirBuilder::new().prefix("vidshrink_").tempdir()?;
        log::debug!("Engine working directory: {}", workdir.path().display());
        self.workdir = Some(workdir);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.workdir.is_some()
    }

    fn write_file(&mut self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        let path = self.resolve(name)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn stage_file(&mut self, name: &str, source: &Path) -> CoreResult<()> {
        let path = self.resolve(name)?;
        std::fs::copy(source, &path)?;
        log::debug!("Staged {} as {}", source.display(), name);
        Ok(())
    }

    fn exec<F>(&mut self, args: &[String], mut handler: F) -> CoreResult<()>
    where
        F: FnMut(EngineEvent),
    {
        let workdir = self.workdir()?.to_path_buf();

        let mut cmd = FfmpegCommand::new();
        cmd.args(args);
        cmd.as_inner_mut().current_dir(&workdir);
        log::debug!("Running engine command: {}", format_command(args));

        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg", e))?;
        let Some(stderr) = child.take_stderr() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CoreError::EngineExec("ffmpeg stderr was not captured".to_string()));
        };

        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        if let Err(e) = forward_stderr(BufReader::new(stderr), &mut tail, &mut handler) {
            log::error!("Reading ffmpeg stderr failed: {e}");
            let _ = child.kill();
            let _ = child.wait();
            return Err(e.into());
        }

        let status = child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e))?;
        if !status.success() {
            let stderr_tail = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(command_failed_error("ffmpeg", status, stderr_tail));
        }
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        let path = self.resolve(name)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::EngineFileNotFound(name.to_string()),
            _ => CoreError::Io(e),
        })
    }

    fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        let path = self.resolve(name)?;
        std::fs::remove_file(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::EngineFileNotFound(name.to_string()),
            _ => CoreError::Io(e),
        })
    }
}
