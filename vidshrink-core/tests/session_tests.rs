use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use vidshrink_core::*;

// --- Test Engine ---

// A minimal engine written against the public trait only: it behaves like
// ffmpeg for a two-minute 720p clip.

const CLIP_LOG: &[&str] = &[
    "ffmpeg version 6.1 Copyright (c) 2000-2023 the FFmpeg developers",
    "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'input.mp4':",
    "  Duration: 00:02:00.00, start: 0.000000, bitrate: 2000 kb/s",
    "  Stream #0:0[0x1](und): Video: h264 (High) (avc1 / 0x31637661), yuv420p(progressive), 1280x720 [SAR 1:1 DAR 16:9], 1868 kb/s, 30 fps",
    "  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo, fltp, 128 kb/s",
    "At least one output file must be specified",
];

#[derive(Default)]
struct ClipEngine {
    loaded: bool,
    files: HashMap<String, Vec<u8>>,
    runs: Vec<Vec<String>>,
}

impl TranscodeEngine for ClipEngine {
    fn load(&mut self, _config: &EngineConfig) -> CoreResult<()> {
        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn write_file(&mut self, name: &str, bytes: &[u8]) -> CoreResult<()> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn exec<F>(&mut self, args: &[String], mut handler: F) -> CoreResult<()>
    where
        F: FnMut(EngineEvent),
    {
        self.runs.push(args.to_vec());
        for line in CLIP_LOG.iter().take(4) {
            handler(EngineEvent::Log((*line).to_string()));
        }
        if args.len() == 2 {
            handler(EngineEvent::Log(CLIP_LOG[5].to_string()));
            return Err(CoreError::EngineExec(CLIP_LOG[5].to_string()));
        }

        handler(EngineEvent::Progress(0.5));
        handler(EngineEvent::Progress(1.0));
        let input_len = self.files.get("input.mp4").map_or(0, Vec::len);
        let output = args.last().cloned().unwrap_or_default();
        self.files.insert(output, vec![0u8; input_len / 4]);
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::EngineFileNotFound(name.to_string()))
    }

    fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CoreError::EngineFileNotFound(name.to_string()))
    }
}

// --- Test Helper Functions ---

fn write_clip(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![1u8; len]).unwrap();
    path
}

fn new_session() -> Session<ClipEngine> {
    let signal = EngineLoader::spawn(ClipEngine::default(), EngineConfig::default());
    Session::new(CompressorConfig::default(), signal).unwrap()
}

// --- Tests ---

#[test]
fn test_probe_predict_compress_save() {
    let dir = tempdir().unwrap();
    let clip = write_clip(dir.path(), "beach day.mov", 4000);
    let mut session = new_session();

    let info = session.select_file(&clip).unwrap().info().clone();
    assert_eq!(info.name, "beach day.mov");
    assert_eq!(info.duration_secs, 120.0);
    assert_eq!(info.bitrate_kbps, 2000);
    assert_eq!(info.resolution.as_deref(), Some("1280×720"));
    assert_eq!(info.source_mime_type, "video/quicktime");

    // One quality step above neutral halves the 2 Mbps source.
    let request = CompressionRequest::new(CompressionMode::Quality { level: 29 });
    let prediction = session.predict(&request).unwrap();
    assert!((prediction.predicted_mb - 16.92).abs() < 1e-9);
    assert_eq!(session.last_prediction(), Some(&prediction));

    let mut progress = Vec::new();
    let outcome = session.compress(&request, |f| progress.push(f)).unwrap();
    assert_eq!(progress, vec![0.5, 1.0]);
    assert_eq!(outcome.input_bytes, 4000);
    assert_eq!(outcome.output_bytes, 1000);
    assert_eq!(outcome.change, Some(SizeChange::Reduction(75.0)));
    assert_eq!(session.state(), SessionState::Done);

    let out = tempdir().unwrap();
    let saved = session.save_output(out.path()).unwrap();
    assert_eq!(saved, out.path().join("beach day_compressed.mp4"));
    assert_eq!(std::fs::metadata(&saved).unwrap().len(), 1000);
}

#[test]
fn test_target_size_uses_probed_duration() {
    let dir = tempdir().unwrap();
    let clip = write_clip(dir.path(), "clip.mp4", 100);
    let mut session = new_session();
    session.select_file(&clip).unwrap();

    let request = CompressionRequest::new(CompressionMode::TargetSize { megabytes: 10.0 });
    let outcome = session.compress(&request, |_| {}).unwrap();

    // 10 MB over 120 s is ~682.7 kbps, minus 128 kbps audio.
    let args: Vec<&str> = outcome.args.iter().map(String::as_str).collect();
    assert_eq!(
        args,
        vec![
            "-i", "input.mp4", "-c:v", "libx264", "-b:v", "555k", "-maxrate", "832k",
            "-bufsize", "1109k", "-c:a", "aac", "-b:a", "128k", "-movflags", "+faststart",
            "output.mp4",
        ]
    );
}

#[test]
fn test_rejected_file_keeps_previous_selection() {
    let dir = tempdir().unwrap();
    let clip = write_clip(dir.path(), "clip.webm", 100);
    let notes = write_clip(dir.path(), "notes.pdf", 100);
    let mut session = new_session();

    session.select_file(&clip).unwrap();
    let err = session.select_file(&notes).unwrap_err();
    assert!(matches!(err, CoreError::NotAVideo(_)));
    assert_eq!(session.video_info().unwrap().name, "clip.webm");
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn test_large_file_warning_is_reported() {
    let dir = tempdir().unwrap();
    let clip = write_clip(dir.path(), "clip.mp4", 2048);
    let config = CompressorConfigBuilder::new()
        .large_file_threshold_bytes(1024)
        .build();
    let signal = EngineLoader::spawn(ClipEngine::default(), EngineConfig::default());
    let mut session = Session::new(config, signal).unwrap();

    let context = session.select_file(&clip).unwrap();
    assert_eq!(
        context.warnings(),
        &[FileWarning::LargeFile {
            size_bytes: 2048,
            threshold_bytes: 1024
        }]
    );
}

#[test]
fn test_output_file_name_follows_selection() {
    let dir = tempdir().unwrap();
    let clip = write_clip(dir.path(), "trip.final.avi", 10);
    let mut session = new_session();
    assert_eq!(session.output_file_name(), None);

    session.select_file(&clip).unwrap();
    assert_eq!(
        session.output_file_name().as_deref(),
        Some("trip.final_compressed.mp4")
    );
}
