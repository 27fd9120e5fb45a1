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


//! Stub transcoder for tests.
//!
//! Writes a small `sh` script that accepts the same command line the real
//! transcoder gets (`... -i <input> <options> <output>`) and answers
//! `-version`. Every invocation's arguments are appended to a log file.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What the stub does when asked to transcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubBehavior {
    /// Copy the input to the output and exit 0
    Copy,
    /// Write a message to stderr and exit 1
    Fail,
    /// Leave the output empty and exit 0
    Empty,
    /// Sleep for the given number of seconds, then copy
    Sleep(u32),
}

impl StubBehavior {
    fn action(self) -> String {
        match self {
            StubBehavior::Copy => r#"cp "$in" "$out""#.to_string(),
            StubBehavior::Fail => {
                r#"echo "$in: Invalid data found when processing input" >&2; exit 1"#.to_string()
            }
            StubBehavior::Empty => r#": > "$out""#.to_string(),
            StubBehavior::Sleep(secs) => format!(r#"sleep {}; cp "$in" "$out""#, secs),
        }
    }
}

/// A stub transcoder script living in its own temp directory
pub struct StubTranscoder {
    dir: TempDir,
    script: PathBuf,
    log: PathBuf,
}

impl StubTranscoder {
    /// Write a stub with the given behavior.
    pub fn new(behavior: StubBehavior) -> Self {
        let dir = TempDir::new().expect("stub dir created");
        let script = dir.path().join("fake-ffmpeg");
        let log = dir.path().join("invocations.log");

        let body = format!(
            r#"#!/bin/sh
echo "$*" >> "{log}"
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 6.1-stub Copyright (c) FilePress tests"
  echo "built for tests"
  exit 0
fi
in=""
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then in="$arg"; fi
  prev="$arg"
  out="$arg"
done
{action}
"#,
            log = log.display(),
            action = behavior.action(),
        );

        fs::write(&script, body).expect("stub script written");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("stub script made executable");

        Self { dir, script, log }
    }

    /// Path to pass as the transcoder binary.
    pub fn path(&self) -> &Path {
        &self.script
    }

    /// Directory holding the script; safe to use as a scratch dir.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Argument lines of every invocation so far.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
