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

//! Audio and video strategy
//!
//! The upload is written to a temporary input file, transcoded into a
//! temporary output file with the same extension, and read back. Both files
//! are removed on every exit path by their [`TempFileHandle`] guards.
//!
//! [`TempFileHandle`]: crate::temp::TempFileHandle

use crate::classify::{extension_for_mime, extension_of, media_type_essence};
use crate::error::{StrategyError, StrategyResult};
use crate::temp::TempResourceManager;
use crate::transcoder::{TranscodeTarget, Transcoder};
use crate::Mode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether an upload is treated as audio or video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Audio-only stream, encoded at a fixed bitrate
    Audio,
    /// Video stream, encoded at constant quality
    Video,
}

impl MediaKind {
    /// `audio/*` is audio, everything else routed here is video
    pub fn from_declared_type(declared_type: &str) -> Self {
        if media_type_essence(declared_type).starts_with("audio/") {
            MediaKind::Audio
        } else {
            MediaKind::Video
        }
    }

    /// Encoder parameters for this kind under `mode`
    pub fn target(self, mode: Mode) -> TranscodeTarget {
        match self {
            MediaKind::Video => TranscodeTarget::Video {
                crf: mode.crf(),
                preset: mode.preset().to_string(),
            },
            MediaKind::Audio => TranscodeTarget::Audio {
                bitrate_kbps: mode.audio_bitrate_kbps(),
            },
        }
    }
}

/// Container extension for an upload
///
/// The file name wins; the declared type is the fallback.
pub fn container_extension(declared_type: &str, file_name: &str) -> StrategyResult<String> {
    let ext = extension_of(file_name);
    if !ext.is_empty() {
        return Ok(ext);
    }
    extension_for_mime(declared_type)
        .map(str::to_string)
        .ok_or_else(|| StrategyError::UnknownContainer(file_name.to_string()))
}

/// Transcoding strategy backed by temp files
#[derive(Debug, Clone)]
pub struct AudioVideoStrategy {
    transcoder: Transcoder,
    temp: TempResourceManager,
}

impl AudioVideoStrategy {
    /// Create a strategy around a shared transcoder
    pub fn new(transcoder: Transcoder, temp: TempResourceManager) -> Self {
        Self { transcoder, temp }
    }

    /// Shared transcoder
    pub fn transcoder(&self) -> &Transcoder {
        &self.transcoder
    }

    /// Temp file manager
    pub fn temp(&self) -> &TempResourceManager {
        &self.temp
    }

    /// Transcode `data`, keeping the container given by `ext`
    pub async fn compress(
        &self,
        data: &[u8],
        mode: Mode,
        kind: MediaKind,
        ext: &str,
    ) -> StrategyResult<Vec<u8>> {
        let input = self.temp.acquire("input", ext)?;
        let output = self.temp.acquire("output", ext)?;

        tokio::fs::write(input.path(), data)
            .await
            .map_err(StrategyError::TempIo)?;

        self.transcoder
            .transcode(input.path(), output.path(), &kind.target(mode))
            .await?;

        let bytes = tokio::fs::read(output.path())
            .await
            .map_err(StrategyError::TempIo)?;
        if bytes.is_empty() {
            return Err(StrategyError::EmptyOutput);
        }

        debug!(
            kind = ?kind,
            input_size = data.len(),
            output_size = bytes.len(),
            "Transcoded media"
        );
        Ok(bytes)
    }
}

impl Default for AudioVideoStrategy {
    fn default() -> Self {
        Self::new(Transcoder::default(), TempResourceManager::default())
    }
}
