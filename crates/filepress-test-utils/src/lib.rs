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


//! # FilePress Test Utilities
//!
//! Shared test utilities for FilePress crates providing:
//! - CLI command helpers for testing the `filepress` binary
//! - Generated image and text fixtures
//! - A stub transcoder script so audio/video paths run without `ffmpeg`

pub mod cli;
pub mod fixtures;
#[cfg(unix)]
pub mod transcoder;

// Re-export commonly used items at crate root
pub use cli::{filepress, FilepressCommand};
pub use fixtures::TestFixtures;
#[cfg(unix)]
pub use transcoder::{StubBehavior, StubTranscoder};

/// Number of `filepress-*` temp files left in `dir`
pub fn leftover_temp_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.file_name().to_string_lossy().starts_with("filepress-"))
                .count()
        })
        .unwrap_or(0)
}
