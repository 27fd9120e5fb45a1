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

//! Brotli strategy for text, code and markup
//!
//! Output is a raw Brotli stream with no framing or marker, so any standard
//! Brotli decoder can read it.

use crate::error::{StrategyError, StrategyResult};
use crate::Mode;
use std::io::{Cursor, Write};

/// Brotli window size (log2)
pub const BROTLI_WINDOW: u32 = 22;

const BUFFER_SIZE: usize = 4096;

/// Brotli strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

impl TextStrategy {
    /// Create a new text strategy
    pub fn new() -> Self {
        TextStrategy
    }

    /// Compress `data` into a single Brotli stream
    ///
    /// Empty input yields a valid (tiny) stream that decodes to nothing.
    pub fn compress(&self, data: &[u8], mode: Mode) -> StrategyResult<Vec<u8>> {
        let mut output = Vec::with_capacity(data.len() / 2 + 16);

        {
            let mut writer = brotli::CompressorWriter::new(
                &mut output,
                BUFFER_SIZE,
                mode.brotli_quality(),
                BROTLI_WINDOW,
            );
            writer.write_all(data).map_err(StrategyError::Brotli)?;
            writer.flush().map_err(StrategyError::Brotli)?;
        } // dropping the writer finishes the stream

        Ok(output)
    }

    /// Decode a Brotli stream produced by [`TextStrategy::compress`]
    pub fn decompress(data: &[u8]) -> StrategyResult<Vec<u8>> {
        let mut output = Vec::with_capacity(data.len() * 3);
        brotli::BrotliDecompress(&mut Cursor::new(data), &mut output)
            .map_err(StrategyError::Brotli)?;
        Ok(output)
    }
}
