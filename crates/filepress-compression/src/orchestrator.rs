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

//! Dispatch entry point
//!
//! [`CompressionOrchestrator::run`] is a single linear pass:
//! validate, classify, resolve, execute, wrap. It keeps no state between
//! calls; the only shared resources are the transcoder permit pool and the
//! temp directory inside the registry.

use crate::artifact::{CompressedArtifact, UploadArtifact};
use crate::classify::classify;
use crate::error::{DispatchError, DispatchResult};
use crate::registry::StrategyRegistry;
use crate::report::CompressionReport;
use crate::transcoder::Transcoder;
use bytes::Bytes;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

/// Classifies uploads and runs the matching strategy
#[derive(Debug, Clone)]
pub struct CompressionOrchestrator {
    registry: StrategyRegistry,
}

impl CompressionOrchestrator {
    /// Create an orchestrator over `registry`
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Orchestrator with default strategies (`ffmpeg` on `PATH`, system temp dir)
    pub fn with_defaults() -> Self {
        Self::new(StrategyRegistry::with_defaults())
    }

    /// Strategy registry
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Transcoder shared by audio/video uploads
    pub fn transcoder(&self) -> &Transcoder {
        self.registry.transcoder()
    }

    /// Compress one upload
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Input`] when the upload has no bytes; no strategy runs
    /// - [`DispatchError::CompressionFailed`] when the selected strategy fails
    pub async fn run(&self, artifact: UploadArtifact) -> DispatchResult<CompressedArtifact> {
        if artifact.is_empty() {
            return Err(DispatchError::input("no file content was provided"));
        }

        let category = classify(&artifact.declared_type, &artifact.file_name);
        let strategy = self.registry.resolve(category);
        let settings = strategy.settings(&artifact);

        let span = info_span!(
            "dispatch",
            file_name = %artifact.file_name,
            declared_type = %artifact.declared_type,
            category = %category,
            mode = %artifact.mode,
        );

        async move {
            let start = Instant::now();
            let output = match strategy.execute(&artifact).await {
                Ok(output) => output,
                Err(e) => {
                    error!(
                        strategy = %strategy.kind(),
                        transcoder = e.is_transcoder(),
                        error = %e,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Compression failed"
                    );
                    return Err(DispatchError::from(e));
                }
            };

            let report = CompressionReport::new(
                category,
                strategy.kind(),
                settings,
                artifact.len(),
                output.len(),
                start.elapsed(),
            );
            info!(
                strategy = %report.strategy,
                settings = %report.settings,
                original_size = report.original_size,
                compressed_size = report.compressed_size,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Compression finished"
            );

            Ok(CompressedArtifact {
                bytes: Bytes::from(output),
                content_type: artifact.declared_type,
                file_name: artifact.file_name,
                report,
            })
        }
        .instrument(span)
        .await
    }
}

impl Default for CompressionOrchestrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::registry::{CodecSettings, StrategyKind};
    use crate::temp::TempResourceManager;
    use crate::transcoder::TranscoderConfig;
    use crate::Mode;

    #[tokio::test]
    async fn test_empty_input_rejected_before_any_strategy() {
        // A transcoder that cannot exist proves the strategy never ran
        let dir = tempfile::TempDir::new().unwrap();
        let registry = StrategyRegistry::new(
            Transcoder::new(TranscoderConfig::with_binary("/nonexistent/ffmpeg")),
            TempResourceManager::new(dir.path()),
        );
        let orchestrator = CompressionOrchestrator::new(registry);

        let err = orchestrator
            .run(UploadArtifact::new(Vec::new(), "video/mp4", "a.mp4", Mode::Max))
            .await
            .unwrap_err();

        assert!(err.is_input());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_generic_preserves_name_and_type() {
        let orchestrator = CompressionOrchestrator::with_defaults();
        let out = orchestrator
            .run(UploadArtifact::new(
                b"abcabcabc".repeat(100),
                "",
                "mystery.xyz",
                Mode::Quality,
            ))
            .await
            .unwrap();

        assert_eq!(out.content_type, "");
        assert_eq!(out.file_name, "mystery.xyz");
        assert_eq!(out.report.category, Category::Generic);
        assert_eq!(out.report.strategy, StrategyKind::GenericBinary);
        assert_eq!(out.report.settings, CodecSettings::Zstd { level: 3 });
        assert_eq!(out.report.original_size, 900);
        assert_eq!(out.report.compressed_size, out.bytes.len());
    }

    #[tokio::test]
    async fn test_strategy_failure_is_normalized() {
        let orchestrator = CompressionOrchestrator::with_defaults();
        let err = orchestrator
            .run(UploadArtifact::new(
                b"not a png".to_vec(),
                "image/png",
                "a.png",
                Mode::Max,
            ))
            .await
            .unwrap_err();

        assert!(err.is_compression_failed());
        assert!(err.to_string().contains("image decode failed"));
    }
}
