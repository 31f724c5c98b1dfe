// ============================================================================
// vidshrink-core/src/engine/mod.rs
// ============================================================================
//
// TRANSCODING ENGINE: Abstraction over the external transcoder
//
// The engine is an opaque collaborator with a private filesystem: inputs are
// staged into it by name, it is executed with an argument vector, and
// outputs are read back by name. Log lines and progress are delivered to a
// caller-supplied handler while it runs.
//
// KEY COMPONENTS:
// - TranscodeEngine: the trait the session drives
// - SidecarEngine: ffmpeg via ffmpeg-sidecar in a private temp directory
// - EngineLoader / ReadySignal: one-shot background loading
// - MockEngine: scripted engine for tests (feature "test-mocks")

use crate::config::EngineConfig;
use crate::error::CoreResult;
use std::path::Path;

pub mod ready;
pub mod sidecar;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use ready::{EngineLoader, ReadySignal};
pub use sidecar::SidecarEngine;

/// Something the engine reports while executing.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// One line of free-text diagnostic output.
    Log(String),
    /// Fractional completion in `0.0..=1.0`.
    Progress(f64),
}

/// Trait representing a transcoding engine with its own file namespace.
pub trait TranscodeEngine {
    /// Prepares the engine; must succeed before any file operation.
    fn load(&mut self, config: &EngineConfig) -> CoreResult<()>;

    /// Whether `load` has completed successfully.
    fn is_loaded(&self) -> bool;

    /// Stages `bytes` under `name` in the engine's filesystem.
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> CoreResult<()>;

    /// Stages the contents of a host file under `name`.
    fn stage_file(&mut self, name: &str, source: &Path) -> CoreResult<()> {
        let bytes = std::fs::read(source)?;
        self.write_file(name, &bytes)
    }

    /// Runs the engine once, forwarding events to `handler`.
    ///
    /// A non-zero exit is reported as an error after all events were
    /// delivered.
    fn exec<F>(&mut self, args: &[String], handler: F) -> CoreResult<()>
    where
        F: FnMut(EngineEvent);

    /// Reads back a file produced by `exec`.
    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>>;

    /// Removes a file from the engine's filesystem.
    fn delete_file(&mut self, name: &str) -> CoreResult<()>;
}
