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

//! Per-dispatch compression report

use crate::classify::Category;
use crate::registry::{CodecSettings, StrategyKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a dispatch did and how well it worked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    /// Classification of the upload
    pub category: Category,
    /// Strategy that ran
    pub strategy: StrategyKind,
    /// Codec parameters used
    pub settings: CodecSettings,
    /// Input size in bytes
    pub original_size: usize,
    /// Output size in bytes
    pub compressed_size: usize,
    /// Time spent in the strategy
    pub elapsed: Duration,
}

impl CompressionReport {
    /// Create a report
    pub fn new(
        category: Category,
        strategy: StrategyKind,
        settings: CodecSettings,
        original_size: usize,
        compressed_size: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            category,
            strategy,
            settings,
            original_size,
            compressed_size,
            elapsed,
        }
    }

    /// Compression ratio (original / compressed)
    ///
    /// 1.0 when either side is empty.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 || self.compressed_size == 0 {
            1.0
        } else {
            self.original_size as f64 / self.compressed_size as f64
        }
    }

    /// Bytes saved; zero when the output grew
    pub fn space_saved(&self) -> usize {
        self.original_size.saturating_sub(self.compressed_size)
    }

    /// Space saved as a percentage of the original; negative when the output grew
    pub fn space_saved_percent(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0
        }
    }

    /// True when the output is smaller than the input
    pub fn is_smaller(&self) -> bool {
        self.compressed_size < self.original_size
    }
}
