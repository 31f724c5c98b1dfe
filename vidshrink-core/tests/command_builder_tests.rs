use vidshrink_core::*;

fn request(mode: CompressionMode) -> CompressionRequest {
    CompressionRequest::new(mode)
}

#[test]
fn test_quality_with_scale_and_fps() {
    let mut req = request(CompressionMode::Quality { level: 28 });
    req.codec = "libx265".to_string();
    req.resolution = "1280x720".parse().unwrap();
    req.frame_rate = "24".parse().unwrap();
    req.audio_bitrate_kbps = 96;

    let args = build_compression_args(&req, Some(60.0), &CompressorConfig::default()).unwrap();
    assert_eq!(
        format_command(&args),
        "ffmpeg -i input.mp4 -c:v libx265 -crf 28 -preset medium -vf scale=1280x720 -r 24 \
         -c:a aac -b:a 96k -movflags +faststart output.mp4"
    );
}

#[test]
fn test_bitrate_mode_ignores_duration() {
    let req = request(CompressionMode::Bitrate { video_mbps: 2.5 });
    let args = build_compression_args(&req, None, &CompressorConfig::default()).unwrap();
    assert_eq!(
        format_command(&args),
        "ffmpeg -i input.mp4 -c:v libx264 -b:v 2.5M -maxrate 2.5M -bufsize 5M \
         -c:a aac -b:a 128k -movflags +faststart output.mp4"
    );
}

#[test]
fn test_target_size_requires_duration() {
    let req = request(CompressionMode::TargetSize { megabytes: 20.0 });
    let config = CompressorConfig::default();
    assert!(matches!(
        build_compression_args(&req, None, &config),
        Err(CoreError::DurationUnknown)
    ));
    assert!(matches!(
        build_compression_args(&req, Some(0.0), &config),
        Err(CoreError::DurationUnknown)
    ));
}

#[test]
fn test_custom_staging_names_and_floor() {
    let config = CompressorConfigBuilder::new()
        .staging_names("src.mkv", "dst.mp4")
        .min_target_bitrate_kbps(800.0)
        .build();
    let req = request(CompressionMode::TargetSize { megabytes: 1.0 });
    let args = build_compression_args(&req, Some(3600.0), &config).unwrap();

    assert_eq!(args[1], "src.mkv");
    assert_eq!(args.last().map(String::as_str), Some("dst.mp4"));
    let bv = args.iter().position(|a| a == "-b:v").unwrap();
    assert_eq!(args[bv + 1], "800k");
}

#[test]
fn test_invalid_request_is_rejected() {
    let mut req = request(CompressionMode::Bitrate { video_mbps: 0.0 });
    assert!(build_compression_args(&req, Some(10.0), &CompressorConfig::default()).is_err());

    req.mode = CompressionMode::Quality { level: 23 };
    req.codec.clear();
    assert!(build_compression_args(&req, Some(10.0), &CompressorConfig::default()).is_err());
}
