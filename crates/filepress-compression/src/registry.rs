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

//! Category to strategy mapping
//!
//! Strategies form a closed set. The registry owns one instance of each and
//! hands out the one matching a [`Category`]; adding a category without a
//! strategy is a compile error.

use crate::artifact::UploadArtifact;
use crate::audio_video::{container_extension, AudioVideoStrategy, MediaKind};
use crate::binary::GenericBinaryStrategy;
use crate::classify::{extension_of, Category};
use crate::error::{StrategyError, StrategyResult};
use crate::raster::{ImageStrategy, ImageTarget};
use crate::temp::TempResourceManager;
use crate::text::{TextStrategy, BROTLI_WINDOW};
use crate::transcoder::Transcoder;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which strategy handled an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// In-memory image re-encode
    Image,
    /// External transcode
    AudioVideo,
    /// Brotli
    Text,
    /// Zstandard
    GenericBinary,
}

impl StrategyKind {
    /// Stable snake_case name
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Image => "image",
            StrategyKind::AudioVideo => "audio_video",
            StrategyKind::Text => "text",
            StrategyKind::GenericBinary => "generic_binary",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete codec parameters chosen for an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "lowercase")]
pub enum CodecSettings {
    /// PNG with deflate level 0-9
    Png {
        /// Deflate level
        level: u8,
    },
    /// Lossy WEBP
    Webp {
        /// Quality factor
        quality: u8,
    },
    /// JPEG
    Jpeg {
        /// Quality factor
        quality: u8,
    },
    /// Constant-quality video
    Video {
        /// Constant rate factor
        crf: u8,
        /// Encoder preset
        preset: String,
    },
    /// Fixed-bitrate audio
    Audio {
        /// Bitrate in kbit/s
        bitrate_kbps: u32,
    },
    /// Brotli stream
    Brotli {
        /// Quality 0-11
        quality: u32,
        /// Window size (log2)
        window: u32,
    },
    /// Zstandard frame
    Zstd {
        /// Level 1-22
        level: i32,
    },
}

impl fmt::Display for CodecSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecSettings::Png { level } => write!(f, "png level {}", level),
            CodecSettings::Webp { quality } => write!(f, "webp quality {}", quality),
            CodecSettings::Jpeg { quality } => write!(f, "jpeg quality {}", quality),
            CodecSettings::Video { crf, preset } => write!(f, "video crf {} preset {}", crf, preset),
            CodecSettings::Audio { bitrate_kbps } => write!(f, "audio {}k", bitrate_kbps),
            CodecSettings::Brotli { quality, window } => {
                write!(f, "brotli quality {} window {}", quality, window)
            }
            CodecSettings::Zstd { level } => write!(f, "zstd level {}", level),
        }
    }
}

/// One of the four compression strategies
#[derive(Debug, Clone)]
pub enum CompressionStrategy {
    /// Re-encode raster images
    Image(ImageStrategy),
    /// Transcode audio and video
    AudioVideo(AudioVideoStrategy),
    /// Brotli for text
    Text(TextStrategy),
    /// Zstandard for everything else
    GenericBinary(GenericBinaryStrategy),
}

impl CompressionStrategy {
    /// Kind of this strategy
    pub fn kind(&self) -> StrategyKind {
        match self {
            CompressionStrategy::Image(_) => StrategyKind::Image,
            CompressionStrategy::AudioVideo(_) => StrategyKind::AudioVideo,
            CompressionStrategy::Text(_) => StrategyKind::Text,
            CompressionStrategy::GenericBinary(_) => StrategyKind::GenericBinary,
        }
    }

    /// Codec parameters this strategy uses for `artifact`
    pub fn settings(&self, artifact: &UploadArtifact) -> CodecSettings {
        let mode = artifact.mode;
        match self {
            CompressionStrategy::Image(_) => {
                match ImageTarget::from_extension(&extension_of(&artifact.file_name)) {
                    ImageTarget::Png => CodecSettings::Png {
                        level: mode.png_level(),
                    },
                    ImageTarget::Webp => CodecSettings::Webp {
                        quality: mode.lossy_quality(),
                    },
                    ImageTarget::Jpeg => CodecSettings::Jpeg {
                        quality: mode.lossy_quality(),
                    },
                }
            }
            CompressionStrategy::AudioVideo(_) => {
                match MediaKind::from_declared_type(&artifact.declared_type) {
                    MediaKind::Video => CodecSettings::Video {
                        crf: mode.crf(),
                        preset: mode.preset().to_string(),
                    },
                    MediaKind::Audio => CodecSettings::Audio {
                        bitrate_kbps: mode.audio_bitrate_kbps(),
                    },
                }
            }
            CompressionStrategy::Text(_) => CodecSettings::Brotli {
                quality: mode.brotli_quality(),
                window: BROTLI_WINDOW,
            },
            CompressionStrategy::GenericBinary(_) => CodecSettings::Zstd {
                level: mode.zstd_level(),
            },
        }
    }

    /// Compress the artifact's bytes
    ///
    /// In-memory codecs run on the blocking pool; the transcode path awaits
    /// the child process.
    pub async fn execute(&self, artifact: &UploadArtifact) -> StrategyResult<Vec<u8>> {
        let mode = artifact.mode;
        match self {
            CompressionStrategy::Image(strategy) => {
                let strategy = *strategy;
                let target = ImageTarget::from_extension(&extension_of(&artifact.file_name));
                run_blocking(artifact.bytes.clone(), move |data| {
                    strategy.compress(data, target, mode)
                })
                .await
            }
            CompressionStrategy::AudioVideo(strategy) => {
                let kind = MediaKind::from_declared_type(&artifact.declared_type);
                let ext = container_extension(&artifact.declared_type, &artifact.file_name)?;
                strategy.compress(&artifact.bytes, mode, kind, &ext).await
            }
            CompressionStrategy::Text(strategy) => {
                let strategy = *strategy;
                run_blocking(artifact.bytes.clone(), move |data| strategy.compress(data, mode))
                    .await
            }
            CompressionStrategy::GenericBinary(strategy) => {
                let strategy = *strategy;
                run_blocking(artifact.bytes.clone(), move |data| strategy.compress(data, mode))
                    .await
            }
        }
    }
}

async fn run_blocking<F>(data: Bytes, f: F) -> StrategyResult<Vec<u8>>
where
    F: FnOnce(&[u8]) -> StrategyResult<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&data))
        .await
        .map_err(|e| StrategyError::worker(e.to_string()))?
}

/// Holds one instance of every strategy
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    image: ImageStrategy,
    audio_video: AudioVideoStrategy,
    text: TextStrategy,
    generic: GenericBinaryStrategy,
}

impl StrategyRegistry {
    /// Build a registry around a transcoder and temp directory
    pub fn new(transcoder: Transcoder, temp: TempResourceManager) -> Self {
        Self {
            image: ImageStrategy::new(),
            audio_video: AudioVideoStrategy::new(transcoder, temp),
            text: TextStrategy::new(),
            generic: GenericBinaryStrategy::new(),
        }
    }

    /// `ffmpeg` from `PATH` and the system temp directory
    pub fn with_defaults() -> Self {
        Self::new(Transcoder::default(), TempResourceManager::default())
    }

    /// Strategy for `category`
    pub fn resolve(&self, category: Category) -> CompressionStrategy {
        match category {
            Category::Image => CompressionStrategy::Image(self.image),
            Category::AudioVideo => CompressionStrategy::AudioVideo(self.audio_video.clone()),
            Category::Text => CompressionStrategy::Text(self.text),
            Category::OfficeOrArchiveOrPdf | Category::Generic => {
                CompressionStrategy::GenericBinary(self.generic)
            }
        }
    }

    /// Transcoder used by the audio/video strategy
    pub fn transcoder(&self) -> &Transcoder {
        self.audio_video.transcoder()
    }

    /// Temp directory used by the audio/video strategy
    pub fn temp(&self) -> &TempResourceManager {
        self.audio_video.temp()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
