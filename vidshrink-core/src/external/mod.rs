// ============================================================================
// vidshrink-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Argument construction for the transcoding engine
//
// This module turns a CompressionRequest into the ordered ffmpeg argument
// vector. It performs no I/O; running the arguments is the engine's job.

pub mod command_builder;

pub use command_builder::{
    CompressionCommandBuilder, VideoFilterChain, build_compression_args, format_command,
    target_bitrate_kbps,
};
