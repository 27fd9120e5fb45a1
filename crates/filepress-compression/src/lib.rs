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

//! Content-adaptive compression for uploaded files
//!
//! This crate classifies an uploaded file by its declared media type and
//! extension, picks a codec strategy for it and returns the compressed payload
//! under the original content type and file name:
//! - **Images**: re-encoded to PNG, WEBP or JPEG depending on the extension
//! - **Audio/Video**: transcoded by an external `ffmpeg` process
//! - **Text**: Brotli stream
//! - **Everything else**: Zstandard frame
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use filepress_compression::{CompressionOrchestrator, Mode, UploadArtifact};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = CompressionOrchestrator::with_defaults();
//!
//!     let upload = UploadArtifact::new(
//!         b"Hello, World! ".repeat(64),
//!         "text/plain",
//!         "hello.txt",
//!         Mode::parse("max"),
//!     );
//!     let compressed = orchestrator.run(upload).await?;
//!
//!     println!(
//!         "{} -> {} bytes ({})",
//!         compressed.report.original_size,
//!         compressed.report.compressed_size,
//!         compressed.report.settings
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Modes
//!
//! Every strategy takes a [`Mode`]. `Quality` keeps output close to the
//! original, `Max` trades fidelity and CPU time for size.

pub mod artifact;
pub mod audio_video;
pub mod binary;
pub mod classify;
pub mod error;
pub mod estimate;
pub mod orchestrator;
pub mod raster;
pub mod registry;
pub mod report;
pub mod temp;
pub mod text;
pub mod transcoder;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use artifact::{CompressedArtifact, UploadArtifact};
pub use audio_video::{AudioVideoStrategy, MediaKind};
pub use binary::GenericBinaryStrategy;
pub use classify::{classify, extension_for_mime, extension_of, mime_for_extension, Category};
pub use error::{DispatchError, DispatchResult, StrategyError, StrategyResult};
pub use estimate::{estimate, EstimateClass, SizeEstimate};
pub use orchestrator::CompressionOrchestrator;
pub use raster::{ImageStrategy, ImageTarget};
pub use registry::{CodecSettings, CompressionStrategy, StrategyKind, StrategyRegistry};
pub use report::CompressionReport;
pub use temp::{TempFileHandle, TempResourceManager};
pub use text::TextStrategy;
pub use transcoder::{Transcoder, TranscoderConfig, TranscoderInfo, TranscodeTarget};

/// Compression aggressiveness selected by the caller
///
/// Every strategy maps the mode to its own codec parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Keep output close to the original (the default)
    #[default]
    Quality,
    /// Smallest output, slowest encode
    Max,
}

impl Mode {
    /// Parse a caller-supplied mode string
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything other than `"max"` resolves to [`Mode::Quality`].
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("max") {
            Mode::Max
        } else {
            Mode::Quality
        }
    }

    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Quality => "quality",
            Mode::Max => "max",
        }
    }

    /// PNG deflate level (0-9)
    pub fn png_level(self) -> u8 {
        match self {
            Mode::Quality => 6,
            Mode::Max => 9,
        }
    }

    /// Quality factor for lossy WEBP and JPEG output (1-100)
    pub fn lossy_quality(self) -> u8 {
        match self {
            Mode::Quality => 90,
            Mode::Max => 50,
        }
    }

    /// Constant rate factor passed to the video encoder
    pub fn crf(self) -> u8 {
        match self {
            Mode::Quality => 23,
            Mode::Max => 36,
        }
    }

    /// Encoder effort preset; `Max` spends more time searching
    pub fn preset(self) -> &'static str {
        match self {
            Mode::Quality => "slower",
            Mode::Max => "veryslow",
        }
    }

    /// Audio bitrate in kbit/s
    pub fn audio_bitrate_kbps(self) -> u32 {
        match self {
            Mode::Quality => 192,
            Mode::Max => 64,
        }
    }

    /// Brotli quality (0-11)
    pub fn brotli_quality(self) -> u32 {
        match self {
            Mode::Quality => 6,
            Mode::Max => 11,
        }
    }

    /// Zstandard level (1-22)
    pub fn zstd_level(self) -> i32 {
        match self {
            Mode::Quality => 3,
            Mode::Max => 20,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parameter_conversions() {
        assert_eq!(Mode::Quality.png_level(), 6);
        assert_eq!(Mode::Max.png_level(), 9);

        assert_eq!(Mode::Quality.lossy_quality(), 90);
        assert_eq!(Mode::Max.lossy_quality(), 50);

        assert_eq!(Mode::Quality.crf(), 23);
        assert_eq!(Mode::Max.crf(), 36);

        assert_eq!(Mode::Quality.audio_bitrate_kbps(), 192);
        assert_eq!(Mode::Max.audio_bitrate_kbps(), 64);

        assert_eq!(Mode::Quality.brotli_quality(), 6);
        assert_eq!(Mode::Max.brotli_quality(), 11);

        assert_eq!(Mode::Quality.zstd_level(), 3);
        assert_eq!(Mode::Max.zstd_level(), 20);
    }

    #[test]
    fn mode_parse_is_case_insensitive() {
        assert_eq!(Mode::parse("max"), Mode::Max);
        assert_eq!(Mode::parse("MAX"), Mode::Max);
        assert_eq!(Mode::parse(" Max "), Mode::Max);
        assert_eq!(Mode::parse("quality"), Mode::Quality);
        assert_eq!(Mode::parse("QUALITY"), Mode::Quality);
    }

    #[test]
    fn unknown_mode_defaults_to_quality() {
        assert_eq!(Mode::parse(""), Mode::Quality);
        assert_eq!(Mode::parse("maximum"), Mode::Quality);
        assert_eq!(Mode::parse("fast"), Mode::Quality);
        assert_eq!(Mode::default(), Mode::Quality);
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::Quality.to_string(), "quality");
        assert_eq!(format!("{}", Mode::Max), "max");
    }
}
