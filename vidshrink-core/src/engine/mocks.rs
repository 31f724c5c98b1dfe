// vidshrink-core/src/engine/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{EngineEvent, TranscodeEngine};
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted outcome of one `exec` call.
#[derive(Debug, Clone, Default)]
pub struct MockRun {
    events: Vec<EngineEvent>,
    failure: Option<String>,
    outputs: Vec<(String, Vec<u8>)>,
}

impl MockRun {
    /// A run that succeeds without emitting anything.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// A run that fails with `message` after emitting its events.
    #[must_use]
    pub fn failure(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A metadata probe: emits `lines` then fails the way ffmpeg does when
    /// no output is named.
    #[must_use]
    pub fn probe(lines: &[&str]) -> Self {
        Self::failure("At least one output file must be specified").with_log_lines(lines)
    }

    #[must_use]
    pub fn with_log_lines(mut self, lines: &[&str]) -> Self {
        self.events
            .extend(lines.iter().map(|l| EngineEvent::Log((*l).to_string())));
        self
    }

    #[must_use]
    pub fn with_progress(mut self, fractions: &[f64]) -> Self {
        self.events
            .extend(fractions.iter().map(|f| EngineEvent::Progress(*f)));
        self
    }

    /// File written into the engine's filesystem when the run succeeds.
    #[must_use]
    pub fn with_output(mut self, name: &str, bytes: &[u8]) -> Self {
        self.outputs.push((name.to_string(), bytes.to_vec()));
        self
    }
}

/// Shared view of what a [`MockEngine`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct MockRecorder {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MockRecorder {
    /// Every argument vector passed to `exec`, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Every name passed to `delete_file`, in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

/// In-memory engine that replays scripted runs.
#[derive(Debug, Default)]
pub struct MockEngine {
    loaded: bool,
    load_failure: Option<String>,
    files: HashMap<String, Vec<u8>>,
    writes: usize,
    write_failure: Option<(usize, String)>,
    runs: VecDeque<MockRun>,
    recorder: MockRecorder,
}

impl MockEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_load_failure(mut self, message: &str) -> Self {
        self.load_failure = Some(message.to_string());
        self
    }

    /// Lets the first `ok_writes` writes succeed; later writes leave a
    /// truncated file behind and fail with `message`.
    #[must_use]
    pub fn with_write_failure_after(mut self, ok_writes: usize, message: &str) -> Self {
        self.write_failure = Some((ok_writes, message.to_string()));
        self
    }

    /// Queues the outcome of the next unscripted `exec`.
    #[must_use]
    pub fn with_run(mut self, run: MockRun) -> Self {
        self.runs.push_back(run);
        self
    }

    /// Handle that stays valid after the engine moves into a session.
    #[must_use]
    pub fn recorder(&self) -> MockRecorder {
        self.recorder.clone()
    }

    #[must_use]
    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn ensure_loaded(&self) -> CoreResult<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(CoreError::EngineNotLoaded)
        }
    }
}

impl TranscodeEngine for MockEngine {
    fn load(&mut self, _config: &EngineConfig) -> CoreResult<()> {
        if let Some(message) = &self.load_failure {
            return Err(CoreError::EngineLoad(message.clone()));
        }
        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn write_file(&mut self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        self.ensure_loaded()?;
        self.writes += 1;
        if let Some((ok_writes, message)) = &self.write_failure {
            if self.writes > *ok_writes {
                let partial = bytes[..bytes.len().min(3)].to_vec();
                self.files.insert(name.to_string(), partial);
                return Err(CoreError::Io(std::io::Error::other(message.clone())));
            }
        }
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn exec<F>(&mut self, args: &[String], mut handler: F) -> CoreResult<()>
    where
        F: FnMut(EngineEvent),
    {
        self.ensure_loaded()?;
        if let Ok(mut calls) = self.recorder.calls.lock() {
            calls.push(args.to_vec());
        }

        let run = self.runs.pop_front().unwrap_or_default();
        for event in run.events {
            handler(event);
        }
        if let Some(message) = run.failure {
            return Err(CoreError::EngineExec(message));
        }
        for (name, bytes) in run.outputs {
            self.files.insert(name, bytes);
        }
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        self.ensure_loaded()?;
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::EngineFileNotFound(name.to_string()))
    }

    fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        self.ensure_loaded()?;
        if let Ok(mut deleted) = self.recorder.deleted.lock() {
            deleted.push(name.to_string());
        }
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::EngineFileNotFound(name.to_string()))
    }
}
