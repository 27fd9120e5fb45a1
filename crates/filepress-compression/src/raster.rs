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

//! In-memory raster image re-encoding
//!
//! The output format follows the upload's extension:
//! - `png` re-encodes to PNG with a mode-dependent deflate effort
//! - `webp` re-encodes to lossy WEBP
//! - anything else (including no extension) re-encodes to JPEG

use crate::error::{StrategyError, StrategyResult};
use crate::Mode;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Output format of the image strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTarget {
    /// Lossless PNG
    Png,
    /// Lossy WEBP
    Webp,
    /// Baseline JPEG
    Jpeg,
}

impl ImageTarget {
    /// Pick the output format for a lowercase extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => ImageTarget::Png,
            "webp" => ImageTarget::Webp,
            _ => ImageTarget::Jpeg,
        }
    }

    /// Lowercase format name
    pub fn as_str(self) -> &'static str {
        match self {
            ImageTarget::Png => "png",
            ImageTarget::Webp => "webp",
            ImageTarget::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deflate level for the PNG encoder, clamped to 1-9
fn png_compression(level: u8) -> CompressionType {
    CompressionType::Level(level.clamp(1, 9))
}

/// Image re-encoding strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageStrategy;

impl ImageStrategy {
    /// Create a new image strategy
    pub fn new() -> Self {
        ImageStrategy
    }

    /// Decode `data` and re-encode it as `target`
    pub fn compress(&self, data: &[u8], target: ImageTarget, mode: Mode) -> StrategyResult<Vec<u8>> {
        let img = image::load_from_memory(data).map_err(StrategyError::ImageDecode)?;
        debug!(
            width = img.width(),
            height = img.height(),
            target = %target,
            "Decoded image"
        );

        match target {
            ImageTarget::Png => encode_png(&img, mode.png_level()),
            ImageTarget::Webp => encode_webp(&img, mode.lossy_quality()),
            ImageTarget::Jpeg => encode_jpeg(&img, mode.lossy_quality()),
        }
    }
}

fn encode_png(img: &DynamicImage, level: u8) -> StrategyResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut output, png_compression(level), FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| StrategyError::image_encode(format!("png: {}", e)))?;
    Ok(output)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> StrategyResult<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| StrategyError::image_encode(format!("jpeg: {}", e)))?;
    Ok(output)
}

fn encode_webp(img: &DynamicImage, quality: u8) -> StrategyResult<Vec<u8>> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| StrategyError::image_encode(format!("webp: {:?}", e)))?;
    Ok(memory.to_vec())
}
