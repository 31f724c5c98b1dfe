// ============================================================================
// vidshrink-core/src/session.rs
// ============================================================================
//
// SESSION: Orchestration of probe, prediction and compression
//
// A Session owns the engine and everything known about the currently
// selected file. Selecting a file builds a fresh MediaContext and replaces
// the previous one wholesale; nothing is reset piecemeal. State moves along
//
//   Idle -> EngineLoading -> Probing -> Ready -> Compressing -> Done
//
// with Error reachable from EngineLoading, Probing and Compressing. A failed
// compression keeps the context so the same request can be retried.

use crate::config::CompressorConfig;
use crate::engine::{EngineEvent, ReadySignal, TranscodeEngine};
use crate::error::{CoreError, CoreResult};
use crate::external::build_compression_args;
use crate::media::{FileSelection, FileWarning, VideoInfo, select_video_file};
use crate::prediction::{SizeChange, SizePrediction, predict_size};
use crate::probe::{parse_log_line, probe_args};
use crate::request::CompressionRequest;
use crate::utils::compressed_file_name;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Observable lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    EngineLoading,
    Probing,
    Ready,
    Compressing,
    Done,
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::EngineLoading => "loading engine",
            Self::Probing => "probing",
            Self::Ready => "ready",
            Self::Compressing => "compressing",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

enum EngineSlot<E> {
    Pending(ReadySignal<E>),
    Loaded(E),
    Failed(String),
}

/// Everything known about the selected file.
#[derive(Debug, Clone)]
pub struct MediaContext {
    selection: FileSelection,
    info: VideoInfo,
    last_prediction: Option<SizePrediction>,
    output: Option<Vec<u8>>,
    input_staged: bool,
}

impl MediaContext {
    fn new(selection: FileSelection, info: VideoInfo) -> Self {
        Self {
            selection,
            info,
            last_prediction: None,
            output: None,
            input_staged: true,
        }
    }

    #[must_use]
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.selection.path
    }

    #[must_use]
    pub fn warnings(&self) -> &[FileWarning] {
        &self.selection.warnings
    }

    #[must_use]
    pub fn last_prediction(&self) -> Option<&SizePrediction> {
        self.last_prediction.as_ref()
    }

    /// Compressed bytes from the last successful run.
    #[must_use]
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }
}

/// Result of a successful compression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionOutcome {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Achieved change relative to the source, `None` for an empty source
    pub change: Option<SizeChange>,
    /// Arguments the engine was run with
    pub args: Vec<String>,
}

/// Orchestration context for one engine and one selected file at a time.
pub struct Session<E: TranscodeEngine> {
    config: CompressorConfig,
    engine: EngineSlot<E>,
    state: SessionState,
    context: Option<MediaContext>,
}

impl<E: TranscodeEngine> Session<E> {
    /// Creates an idle session whose engine arrives through `engine`.
    pub fn new(config: CompressorConfig, engine: ReadySignal<E>) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: EngineSlot::Pending(engine),
            state: SessionState::Idle,
            context: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> Option<&MediaContext> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.context.as_ref().map(MediaContext::info)
    }

    #[must_use]
    pub fn last_prediction(&self) -> Option<&SizePrediction> {
        self.context.as_ref().and_then(MediaContext::last_prediction)
    }

    /// The loaded engine, if loading has completed.
    #[must_use]
    pub fn engine(&self) -> Option<&E> {
        match &self.engine {
            EngineSlot::Loaded(engine) => Some(engine),
            _ => None,
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log::debug!("Session state: {} -> {}", self.state, state);
            self.state = state;
        }
    }

    /// Resolves the engine slot, waiting for a pending load once.
    fn ensure_engine(&mut self) -> CoreResult<&mut E> {
        if let EngineSlot::Pending(_) = self.engine {
            let slot = std::mem::replace(
                &mut self.engine,
                EngineSlot::Failed("engine load interrupted".to_string()),
            );
            if let EngineSlot::Pending(signal) = slot {
                self.engine = match signal.wait() {
                    Ok(engine) => {
                        log::info!("Transcoding engine ready");
                        EngineSlot::Loaded(engine)
                    }
                    Err(e) => {
                        log::error!("Transcoding engine failed to load: {e}");
                        EngineSlot::Failed(e.to_string())
                    }
                };
            }
        }

        match &mut self.engine {
            EngineSlot::Loaded(engine) => Ok(engine),
            EngineSlot::Failed(message) => Err(CoreError::EngineLoad(message.clone())),
            EngineSlot::Pending(_) => Err(CoreError::EngineNotLoaded),
        }
    }

    /// Stages `source` and harvests metadata from a probe run.
    ///
    /// The probe names no output, so ffmpeg exits with an error after
    /// printing the stream summary; that failure is expected and ignored.
    fn probe(engine: &mut E, input_name: &str, source: &Path, info: &mut VideoInfo) -> CoreResult<()> {
        engine.stage_file(input_name, source)?;

        let result = engine.exec(&probe_args(input_name), |event| {
            if let EngineEvent::Log(line) = event {
                log::debug!(target: "ffmpeg_log", "{line}");
                parse_log_line(&line, info);
            }
        });
        if let Err(e) = result {
            log::warn!("Probe finished with expected error: {e}");
        }
        Ok(())
    }

    /// Validates, stages and probes `path`, replacing any previous file.
    ///
    /// A non-video file is rejected before anything else happens and leaves
    /// the session untouched. Once a file passes validation the previous
    /// context is dropped, so engine and staging failures leave the session
    /// in [`SessionState::Error`] with no file selected.
    pub fn select_file(&mut self, path: &Path) -> CoreResult<&MediaContext> {
        let selection = select_video_file(path, self.config.large_file_threshold_bytes)?;
        log::info!("Selected {} ({} bytes)", selection.name, selection.size_bytes);
        // Staging overwrites the previous input, so its context is gone either way.
        self.context = None;

        self.set_state(SessionState::EngineLoading);
        let input_name = self.config.input_name.clone();
        let fallback_duration = self.config.fallback_duration_secs;

        let mut info = VideoInfo::new(
            selection.name.clone(),
            selection.size_bytes,
            selection.mime_type.clone(),
        );

        if let Err(e) = self.ensure_engine() {
            self.set_state(SessionState::Error);
            return Err(e);
        }

        self.set_state(SessionState::Probing);
        let probed = match self.ensure_engine() {
            Ok(engine) => Self::probe(engine, &input_name, &selection.path, &mut info),
            Err(e) => Err(e),
        };
        if let Err(e) = probed {
            self.set_state(SessionState::Error);
            return Err(e);
        }

        info.apply_probe_fallbacks(fallback_duration);
        log::info!(
            "Probed {}: {:.2}s, {} kbps, {}",
            info.name,
            info.duration_secs,
            info.bitrate_kbps,
            info.resolution.as_deref().unwrap_or("unknown resolution")
        );

        self.set_state(SessionState::Ready);
        Ok(self.context.insert(MediaContext::new(selection, info)))
    }

    /// Estimates the output size of `request` for the selected file.
    ///
    /// Returns `None` when no file is selected, the duration is unknown or
    /// the request is invalid. A produced estimate is remembered as the
    /// last prediction.
    pub fn predict(&mut self, request: &CompressionRequest) -> Option<SizePrediction> {
        let context = self.context.as_mut()?;
        if let Err(e) = request.validate() {
            log::debug!("No prediction for invalid request: {e}");
            return None;
        }
        let prediction = predict_size(&context.info, request, &self.config)?;
        context.last_prediction = Some(prediction);
        Some(prediction)
    }

    fn run_compression<F>(
        engine: &mut E,
        args: &[String],
        staging: (&str, Option<&Path>),
        output_name: &str,
        mut on_progress: F,
    ) -> CoreResult<Vec<u8>>
    where
        F: FnMut(f64),
    {
        let (input_name, restage) = staging;
        if let Some(source) = restage {
            engine.stage_file(input_name, source)?;
        }
        // A leftover output from an earlier run would make ffmpeg prompt.
        let _ = engine.delete_file(output_name);

        engine.exec(args, |event| match event {
            EngineEvent::Progress(fraction) => on_progress(fraction),
            EngineEvent::Log(line) => log::debug!(target: "ffmpeg_log", "{line}"),
        })?;

        let bytes = engine.read_file(output_name)?;
        for name in [input_name, output_name] {
            if let Err(e) = engine.delete_file(name) {
                log::debug!("Ignoring cleanup failure for {name}: {e}");
            }
        }
        Ok(bytes)
    }

    /// Compresses the selected file according to `request`.
    ///
    /// `on_progress` receives completion fractions while the engine runs.
    /// On failure the session enters [`SessionState::Error`] but keeps the
    /// selected file, so the call may be repeated.
    pub fn compress<F>(&mut self, request: &CompressionRequest, on_progress: F) -> CoreResult<CompressionOutcome>
    where
        F: FnMut(f64),
    {
        let context = self.context.as_ref().ok_or(CoreError::NoFileSelected)?;
        let args = build_compression_args(request, Some(context.info.duration_secs), &self.config)?;
        let input_bytes = context.info.size_bytes;
        let restage = (!context.input_staged).then(|| context.selection.path.clone());
        let input_name = self.config.input_name.clone();
        let output_name = self.config.output_name.clone();

        log::info!("Compressing {} in {} mode", context.info.name, request.mode.label());
        self.set_state(SessionState::Compressing);
        if let Some(context) = self.context.as_mut() {
            context.output = None;
        }

        let result = match self.ensure_engine() {
            Ok(engine) => Self::run_compression(
                engine,
                &args,
                (&input_name, restage.as_deref()),
                &output_name,
                on_progress,
            ),
            Err(e) => Err(e),
        };

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Compression failed: {e}");
                self.set_state(SessionState::Error);
                return Err(e);
            }
        };

        let output_bytes = bytes.len() as u64;
        let change = SizeChange::between(input_bytes as f64, output_bytes as f64);
        if let Some(context) = self.context.as_mut() {
            context.output = Some(bytes);
            context.input_staged = false;
        }
        self.set_state(SessionState::Done);

        Ok(CompressionOutcome {
            input_bytes,
            output_bytes,
            change,
            args,
        })
    }

    /// Name the compressed output is saved under.
    #[must_use]
    pub fn output_file_name(&self) -> Option<String> {
        self.context
            .as_ref()
            .map(|context| compressed_file_name(&context.info.name))
    }

    /// Writes the compressed output to `dir` as `<base>_compressed.mp4`.
    pub fn save_output(&self, dir: &Path) -> CoreResult<PathBuf> {
        let context = self.context.as_ref().ok_or(CoreError::NoFileSelected)?;
        let bytes = context.output.as_deref().ok_or(CoreError::NoOutput)?;

        std::fs::create_dir_all(dir).map_err(|e| {
            CoreError::PathError(format!("Failed to create '{}': {}", dir.display(), e))
        })?;
        let path = dir.join(compressed_file_name(&context.info.name));
        std::fs::write(&path, bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineLoader;
    use crate::engine::mocks::{MockEngine, MockRun};
    use crate::request::CompressionMode;
    use tempfile::TempDir;

    const PROBE_LINES: &[&str] = &[
        "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'input.mp4':",
        "  Duration: 00:01:00.00, start: 0.000000, bitrate: 2000 kb/s",
        "    Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720, 1871 kb/s, 30 fps",
        "At least one output file must be specified",
    ];

    fn video_file(dir: &TempDir, name: &str, len: usize) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![7u8; len]).unwrap();
        path
    }

    fn session_with(engine: MockEngine) -> Session<MockEngine> {
        let signal = EngineLoader::spawn(engine, Default::default());
        Session::new(CompressorConfig::default(), signal).unwrap()
    }

    #[test]
    fn test_select_file_probes_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 1024);
        let mut session = session_with(MockEngine::new().with_run(MockRun::probe(PROBE_LINES)));
        assert_eq!(session.state(), SessionState::Idle);

        let context = session.select_file(&path).unwrap();
        assert_eq!(context.info().duration_secs, 60.0);
        assert_eq!(context.info().bitrate_kbps, 2000);
        assert_eq!(context.info().resolution.as_deref(), Some("1280×720"));
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.engine().unwrap().has_file("input.mp4"));
    }

    #[test]
    fn test_non_video_is_rejected_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "notes.txt", 10);
        let engine = MockEngine::new();
        let recorder = engine.recorder();
        let mut session = session_with(engine);

        assert!(matches!(session.select_file(&path), Err(CoreError::NotAVideo(_))));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.context().is_none());
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_engine_load_failure_moves_to_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 10);
        let mut session = session_with(MockEngine::new().with_load_failure("download failed"));

        let err = session.select_file(&path).err().unwrap();
        assert!(matches!(err, CoreError::EngineLoad(_)));
        assert_eq!(session.state(), SessionState::Error);

        // No automatic retry: the failure is sticky.
        assert!(matches!(session.select_file(&path), Err(CoreError::EngineLoad(_))));
    }

    #[test]
    fn test_probe_without_metadata_uses_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 50_000);
        let mut session = session_with(MockEngine::new().with_run(MockRun::probe(&[])));

        let info = session.select_file(&path).unwrap().info().clone();
        assert_eq!(info.duration_secs, 5.0);
        assert_eq!(info.bitrate_kbps, 80);
    }

    #[test]
    fn test_failed_staging_drops_previous_context() {
        let dir = tempfile::tempdir().unwrap();
        let first = video_file(&dir, "first.mp4", 12);
        let second = video_file(&dir, "second.mp4", 12);
        let engine = MockEngine::new()
            .with_run(MockRun::probe(PROBE_LINES))
            .with_write_failure_after(1, "disk full");
        let recorder = engine.recorder();
        let mut session = session_with(engine);
        session.select_file(&first).unwrap();

        let err = session.select_file(&second).unwrap_err();
        assert_eq!(err.to_string(), "I/O error: disk full");
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.context().is_none());
        assert!(session.predict(&CompressionRequest::default()).is_none());

        // Nothing may compress the partially staged bytes under the old name.
        assert!(matches!(
            session.compress(&CompressionRequest::default(), |_| {}),
            Err(CoreError::NoFileSelected)
        ));
        assert_eq!(recorder.calls().len(), 1);
    }

    #[test]
    fn test_new_selection_replaces_context() {
        let dir = tempfile::tempdir().unwrap();
        let first = video_file(&dir, "first.mp4", 100);
        let second = video_file(&dir, "second.mkv", 200);
        let engine = MockEngine::new()
            .with_run(MockRun::probe(PROBE_LINES))
            .with_run(MockRun::success().with_output("output.mp4", b"small"))
            .with_run(MockRun::probe(&[]));
        let mut session = session_with(engine);

        session.select_file(&first).unwrap();
        let request = CompressionRequest::new(CompressionMode::Quality { level: 28 });
        session.predict(&request).unwrap();
        session.compress(&request, |_| {}).unwrap();
        assert!(session.context().unwrap().output().is_some());

        let context = session.select_file(&second).unwrap();
        assert_eq!(context.info().name, "second.mkv");
        assert!(context.last_prediction().is_none());
        assert!(context.output().is_none());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_predict_requires_selection() {
        let mut session = session_with(MockEngine::new());
        assert!(session.predict(&CompressionRequest::default()).is_none());
    }

    #[test]
    fn test_compress_reports_progress_and_saves_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "holiday.mov", 1000);
        let engine = MockEngine::new()
            .with_run(MockRun::probe(PROBE_LINES))
            .with_run(
                MockRun::success()
                    .with_progress(&[0.25, 0.5, 1.0])
                    .with_output("output.mp4", &[1u8; 250]),
            );
        let recorder = engine.recorder();
        let mut session = session_with(engine);
        session.select_file(&path).unwrap();

        let mut seen = Vec::new();
        let request = CompressionRequest::new(CompressionMode::Bitrate { video_mbps: 1.0 });
        let outcome = session.compress(&request, |f| seen.push(f)).unwrap();

        assert_eq!(seen, vec![0.25, 0.5, 1.0]);
        assert_eq!(outcome.output_bytes, 250);
        assert_eq!(outcome.change, Some(SizeChange::Reduction(75.0)));
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(recorder.calls()[1], outcome.args);

        let out_dir = tempfile::tempdir().unwrap();
        let saved = session.save_output(out_dir.path()).unwrap();
        assert_eq!(saved.file_name().unwrap(), "holiday_compressed.mp4");
        assert_eq!(std::fs::read(saved).unwrap().len(), 250);
    }

    #[test]
    fn test_compress_failure_allows_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 1000);
        let engine = MockEngine::new()
            .with_run(MockRun::probe(PROBE_LINES))
            .with_run(MockRun::failure("Unknown encoder 'libnothing'"))
            .with_run(MockRun::success().with_output("output.mp4", &[0u8; 10]));
        let mut session = session_with(engine);
        session.select_file(&path).unwrap();

        let request = CompressionRequest::default();
        let err = session.compress(&request, |_| {}).unwrap_err();
        assert!(matches!(err, CoreError::EngineExec(_)));
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.context().is_some());

        session.compress(&request, |_| {}).unwrap();
        assert_eq!(session.state(), SessionState::Done);
    }

    #[test]
    fn test_compress_without_selection() {
        let mut session = session_with(MockEngine::new());
        assert!(matches!(
            session.compress(&CompressionRequest::default(), |_| {}),
            Err(CoreError::NoFileSelected)
        ));
    }

    #[test]
    fn test_save_before_compress() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 10);
        let mut session = session_with(MockEngine::new().with_run(MockRun::probe(PROBE_LINES)));
        session.select_file(&path).unwrap();
        assert!(matches!(session.save_output(dir.path()), Err(CoreError::NoOutput)));
    }

    #[test]
    fn test_success_cleans_staging_and_restages_on_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let path = video_file(&dir, "clip.mp4", 100);
        let engine = MockEngine::new()
            .with_run(MockRun::probe(PROBE_LINES))
            .with_run(MockRun::success().with_output("output.mp4", &[0u8; 40]))
            .with_run(MockRun::success().with_output("output.mp4", &[0u8; 20]));
        let recorder = engine.recorder();
        let mut session = session_with(engine);
        session.select_file(&path).unwrap();

        let request = CompressionRequest::default();
        session.compress(&request, |_| {}).unwrap();
        assert!(!session.engine().unwrap().has_file("input.mp4"));
        assert!(!session.engine().unwrap().has_file("output.mp4"));
        assert!(recorder.deleted().contains(&"input.mp4".to_string()));

        let outcome = session.compress(&request, |_| {}).unwrap();
        assert_eq!(outcome.output_bytes, 20);
        assert_eq!(session.context().unwrap().output().map(<[u8]>::len), Some(20));
    }
}
