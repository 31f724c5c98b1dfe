//! Background engine loading with a one-shot readiness signal.
//!
//! Loading ffmpeg may involve a download, so it runs on its own thread. The
//! caller gets a [`ReadySignal`] that resolves exactly once with the loaded
//! engine or the load error; waiting on it blocks without polling.

use super::TranscodeEngine;
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Starts engine loads off the calling thread.
pub struct EngineLoader;

impl EngineLoader {
    /// Moves `engine` to a worker thread and calls `load` there.
    pub fn spawn<E>(mut engine: E, config: EngineConfig) -> ReadySignal<E>
    where
        E: TranscodeEngine + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        thread::spawn(move || {
            log::debug!("Loading transcoding engine");
            let result = engine.load(&config).map(|()| engine);
            // The receiver may already be gone if the caller gave up.
            let _ = sender.send(result);
        });
        ReadySignal { receiver }
    }
}

/// Resolves once with the outcome of an engine load.
pub struct ReadySignal<E> {
    receiver: Receiver<CoreResult<E>>,
}

impl<E> ReadySignal<E> {
    /// Blocks until the load finishes. Consumes the signal.
    pub fn wait(self) -> CoreResult<E> {
        self.receiver.recv().map_err(|_| {
            CoreError::EngineLoad("engine loader exited without reporting".to_string())
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mocks::MockEngine;

    #[test]
    fn test_spawned_load_resolves_with_engine() {
        let signal = EngineLoader::spawn(MockEngine::new(), EngineConfig::default());
        let engine = signal.wait().unwrap();
        assert!(engine.is_loaded());
    }

    #[test]
    fn test_load_failure_is_reported() {
        let engine = MockEngine::new().with_load_failure("no ffmpeg");
        let signal = EngineLoader::spawn(engine, EngineConfig::default());
        let err = signal.wait().err().unwrap();
        assert!(matches!(err, CoreError::EngineLoad(msg) if msg.contains("no ffmpeg")));
    }
}
