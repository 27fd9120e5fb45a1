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

//! Scoped temporary files for the transcoder
//!
//! Every [`TempFileHandle`] has a unique name in the manager's directory and
//! removes its file when dropped. Removal failures are logged and swallowed.

use crate::error::{StrategyError, StrategyResult};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, warn};

/// Prefix shared by every temporary file this crate creates
pub const TEMP_PREFIX: &str = "filepress-";

/// Creates uniquely named temporary files in one directory
#[derive(Debug, Clone)]
pub struct TempResourceManager {
    dir: PathBuf,
}

impl TempResourceManager {
    /// Use `dir` for temporary files
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use the system temporary directory
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Directory temporary files are created in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty, uniquely named file ending in `.{ext}`
    ///
    /// `label` only makes the name readable (`filepress-input-XXXXXX.mp4`).
    pub fn acquire(&self, label: &str, ext: &str) -> StrategyResult<TempFileHandle> {
        let prefix = format!("{}{}-", TEMP_PREFIX, label);
        let suffix = if ext.is_empty() {
            String::new()
        } else {
            format!(".{}", ext.trim_start_matches('.'))
        };

        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.dir)
            .map_err(StrategyError::TempIo)?;
        let path = file.into_temp_path();
        debug!(path = %path.display(), "Acquired temp file");

        Ok(TempFileHandle { path: Some(path) })
    }
}

impl Default for TempResourceManager {
    fn default() -> Self {
        Self::system()
    }
}

/// Owned temporary path, deleted on drop
#[derive(Debug)]
pub struct TempFileHandle {
    path: Option<TempPath>,
}

impl TempFileHandle {
    /// Path of the file
    ///
    /// Empty after [`TempFileHandle::release`].
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// True while this handle is still responsible for deleting the file
    pub fn owns(&self) -> bool {
        self.path.is_some()
    }

    /// Delete the file now
    ///
    /// A file that is already gone counts as released.
    pub fn release(&mut self) -> io::Result<()> {
        match self.path.take() {
            Some(path) => match path.close() {
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
            None => Ok(()),
        }
    }
}

impl Drop for TempFileHandle {
    fn drop(&mut self) {
        let shown = self.path().display().to_string();
        if let Err(e) = self.release() {
            warn!(path = %shown, error = %e, "Failed to remove temp file");
        }
    }
}
