// FilePress - Content-aware file compression
// Copyright (C) 2025 FilePress Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.


//! Shared server state

use filepress_compression::{
    CompressionOrchestrator, Mode, StrategyRegistry, TempResourceManager, Transcoder,
    TranscoderConfig,
};
use filepress_config::Config;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dispatcher for uploads
    pub orchestrator: CompressionOrchestrator,

    /// Mode used when a request carries no `mode` field
    pub default_mode: Mode,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Create state around an existing orchestrator
    pub fn new(orchestrator: CompressionOrchestrator, default_mode: Mode, max_upload_bytes: u64) -> Self {
        Self {
            orchestrator,
            default_mode,
            max_upload_bytes,
        }
    }

    /// Build the orchestrator and limits from loaded configuration
    ///
    /// The temp directory must already exist.
    pub fn from_config(config: &Config) -> Self {
        let transcoder = Transcoder::new(TranscoderConfig {
            binary: config.transcoder.binary.clone().into(),
            max_concurrent: config.transcoder.max_concurrent,
            timeout: config.transcoder.timeout(),
        });
        let temp = TempResourceManager::new(config.compression.resolved_temp_dir());

        Self::new(
            CompressionOrchestrator::new(StrategyRegistry::new(transcoder, temp)),
            Mode::parse(&config.compression.default_mode),
            config.server.max_upload_bytes,
        )
    }

    /// Mode for a request, falling back to the configured default
    pub fn mode_for(&self, requested: Option<&str>) -> Mode {
        requested.map(Mode::parse).unwrap_or(self.default_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepress_config::{CompressionConfig, TranscoderConfig as TranscoderSection};
    use std::time::Duration;

    #[test]
    fn test_from_config() {
        let config = Config {
            compression: CompressionConfig {
                default_mode: "max".to_string(),
                temp_dir: Some("/tmp/filepress-test".into()),
            },
            transcoder: TranscoderSection {
                binary: "/opt/ffmpeg/bin/ffmpeg".to_string(),
                max_concurrent: 3,
                timeout_secs: 42,
            },
            ..Default::default()
        };

        let state = AppState::from_config(&config);
        let transcoder = state.orchestrator.transcoder();
        assert_eq!(state.default_mode, Mode::Max);
        assert_eq!(transcoder.config().binary.to_str(), Some("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(transcoder.available_permits(), 3);
        assert_eq!(transcoder.config().timeout, Duration::from_secs(42));
        assert_eq!(
            state.orchestrator.registry().temp().dir(),
            std::path::Path::new("/tmp/filepress-test")
        );
    }

    #[test]
    fn test_mode_for() {
        let state = AppState::new(CompressionOrchestrator::with_defaults(), Mode::Max, 1024);
        assert_eq!(state.mode_for(None), Mode::Max);
        assert_eq!(state.mode_for(Some("quality")), Mode::Quality);
        assert_eq!(state.mode_for(Some("bogus")), Mode::Quality);
    }
}
