// ============================================================================
// vidshrink-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CompressorConfig
//
// Fluent construction of CompressorConfig. Every setter starts from the
// library defaults, so callers only name what they change.

use super::CompressorConfig;

/// Builder for [`CompressorConfig`].
#[derive(Debug, Clone, Default)]
pub struct CompressorConfigBuilder {
    config: CompressorConfig,
}

impl CompressorConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size-neutral quality level.
    #[must_use]
    pub fn neutral_quality(mut self, level: u8) -> Self {
        self.config.neutral_quality = level;
        self
    }

    /// Sets the quality delta that halves the estimate.
    #[must_use]
    pub fn quality_step(mut self, step: f64) -> Self {
        self.config.quality_step = step;
        self
    }

    /// Sets the target-size bitrate floor in kbps.
    #[must_use]
    pub fn min_target_bitrate_kbps(mut self, kbps: f64) -> Self {
        self.config.min_target_bitrate_kbps = kbps;
        self
    }

    /// Sets the duration used when probing finds none.
    #[must_use]
    pub fn fallback_duration_secs(mut self, secs: f64) -> Self {
        self.config.fallback_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn large_file_threshold_bytes(mut self, bytes: u64) -> Self {
        self.config.large_file_threshold_bytes = bytes;
        self
    }

    #[must_use]
    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.config.audio_codec = codec.to_string();
        self
    }

    #[must_use]
    pub fn encoder_preset(mut self, preset: &str) -> Self {
        self.config.encoder_preset = preset.to_string();
        self
    }

    /// Sets the engine-side staging names for input and output.
    #[must_use]
    pub fn staging_names(mut self, input: &str, output: &str) -> Self {
        self.config.input_name = input.to_string();
        self.config.output_name = output.to_string();
        self
    }

    /// Finishes the builder. Call [`CompressorConfig::validate`] before use.
    #[must_use]
    pub fn build(self) -> CompressorConfig {
        self.config
    }
}
