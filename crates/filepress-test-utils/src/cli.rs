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


//! CLI command helpers for testing the `filepress` binary.
//!
//! Provides convenient wrappers around assert_cmd.

use assert_cmd::Command;
use std::path::Path;

/// Creates a new `filepress` Command for testing.
///
/// # Example
/// ```ignore
/// use filepress_test_utils::filepress;
///
/// filepress()
///     .args(["classify", "notes.txt"])
///     .current_dir(temp_dir.path())
///     .assert()
///     .success();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn filepress() -> Command {
    Command::cargo_bin("filepress").expect("filepress binary not found")
}

/// Fluent wrapper for common `filepress` invocations.
pub struct FilepressCommand {
    cmd: Command,
}

impl FilepressCommand {
    /// Create a new FilepressCommand.
    pub fn new() -> Self {
        let mut cmd = filepress();
        // Keep user configuration and log settings out of tests
        for var in [
            "FILEPRESS_CONFIG",
            "FILEPRESS_HOST",
            "FILEPRESS_PORT",
            "FILEPRESS_MAX_UPLOAD_BYTES",
            "FILEPRESS_DEFAULT_MODE",
            "FILEPRESS_TEMP_DIR",
            "FILEPRESS_FFMPEG",
            "FILEPRESS_MAX_TRANSCODES",
            "FILEPRESS_TRANSCODE_TIMEOUT",
            "FILEPRESS_LOG_LEVEL",
            "FILEPRESS_LOG_FORMAT",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        Self { cmd }
    }

    /// Set the working directory for the command.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    /// Add an argument to the command.
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Add multiple arguments to the command.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Set an environment variable for the command.
    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Execute the command and assert success.
    pub fn run_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }
}

impl Default for FilepressCommand {
    fn default() -> Self {
        Self::new()
    }
}
