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

//! Zstandard strategy for documents, archives and unknown binaries
//!
//! Lossless. The output is exactly one Zstandard frame.

use crate::error::{StrategyError, StrategyResult};
use crate::Mode;

/// Zstandard frame magic number
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Zstandard strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericBinaryStrategy;

impl GenericBinaryStrategy {
    /// Create a new generic binary strategy
    pub fn new() -> Self {
        GenericBinaryStrategy
    }

    /// Compress `data` into a single Zstandard frame
    pub fn compress(&self, data: &[u8], mode: Mode) -> StrategyResult<Vec<u8>> {
        zstd::encode_all(data, mode.zstd_level()).map_err(StrategyError::Zstd)
    }

    /// Decode a frame produced by [`GenericBinaryStrategy::compress`]
    pub fn decompress(data: &[u8]) -> StrategyResult<Vec<u8>> {
        zstd::decode_all(data).map_err(StrategyError::Zstd)
    }
}
