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


//! Settings shared by every command.

use anyhow::{Context as _, Result};
use filepress_compression::{
    extension_of, mime_for_extension, CompressionOrchestrator, Mode, StrategyRegistry,
    TempResourceManager, Transcoder, TranscoderConfig,
};
use filepress_config::Config;
use std::path::Path;

/// Loaded configuration plus global flags
pub struct Context {
    /// Effective configuration (file, then environment)
    pub config: Config,
    /// `--quiet`
    pub quiet: bool,
}

impl Context {
    /// Create a context
    pub fn new(config: Config, quiet: bool) -> Self {
        Self { config, quiet }
    }

    /// Mode used when `--mode` is not given
    pub fn default_mode(&self) -> Mode {
        Mode::parse(&self.config.compression.default_mode)
    }

    /// Transcoder settings, with an optional binary override
    pub fn transcoder_config(&self, binary: Option<&Path>) -> TranscoderConfig {
        let section = &self.config.transcoder;
        TranscoderConfig {
            binary: binary
                .map(Path::to_path_buf)
                .unwrap_or_else(|| section.binary.clone().into()),
            max_concurrent: section.max_concurrent,
            timeout: section.timeout(),
        }
    }

    /// Orchestrator for this run; creates the temp directory if needed
    pub async fn orchestrator(&self) -> Result<CompressionOrchestrator> {
        let temp_dir = self.config.compression.resolved_temp_dir();
        tokio::fs::create_dir_all(&temp_dir)
            .await
            .with_context(|| format!("Failed to create temp directory {}", temp_dir.display()))?;

        Ok(CompressionOrchestrator::new(StrategyRegistry::new(
            Transcoder::new(self.transcoder_config(None)),
            TempResourceManager::new(temp_dir),
        )))
    }
}

/// File name component of `path`, as sent by an uploading client
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Declared type: the explicit `--type`, else inferred from the extension
///
/// Unknown extensions give an empty type, like a client that sent none.
pub fn declared_type(path: &Path, explicit: Option<&str>) -> String {
    match explicit {
        Some(mime) => mime.to_string(),
        None => mime_for_extension(&extension_of(&upload_name(path)))
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepress_config::CompressionConfig;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type(Path::new("dir/Photo.JPG"), None), "image/jpeg");
        assert_eq!(declared_type(Path::new("notes.txt"), Some("text/markdown")), "text/markdown");
        assert_eq!(declared_type(Path::new("blob.qqq"), None), "");
        assert_eq!(declared_type(Path::new("README"), None), "");
    }

    #[test]
    fn test_transcoder_override() {
        let ctx = Context::new(Config::default(), false);
        let overridden = ctx.transcoder_config(Some(Path::new("/opt/ffmpeg")));
        assert_eq!(overridden.binary, PathBuf::from("/opt/ffmpeg"));
        assert_eq!(overridden.timeout, Duration::from_secs(600));

        let configured = ctx.transcoder_config(None);
        assert_eq!(configured.binary, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_default_mode_from_config() {
        let config = Config {
            compression: CompressionConfig {
                default_mode: "max".to_string(),
                temp_dir: None,
            },
            ..Default::default()
        };
        assert_eq!(Context::new(config, false).default_mode(), Mode::Max);
    }
}
