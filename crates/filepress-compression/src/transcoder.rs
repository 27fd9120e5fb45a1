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

//! External `ffmpeg` process runner
//!
//! [`Transcoder`] is cheap to clone; clones share one permit pool, so the
//! number of concurrently running child processes never exceeds
//! `max_concurrent`. Children are spawned with `kill_on_drop`, so dropping the
//! future (caller disconnect or timeout) kills the process.

use crate::error::{StrategyError, StrategyResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Upper bound on how long `-version` may take
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of stderr bytes kept in error messages
const STDERR_TAIL: usize = 2048;

/// Transcoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscoderConfig {
    /// Binary name or path
    pub binary: PathBuf,
    /// Maximum concurrently running processes
    pub max_concurrent: usize,
    /// Wall-clock limit per transcode
    pub timeout: Duration,
}

impl TranscoderConfig {
    /// Default settings with a different binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            max_concurrent: num_cpus::get().max(1),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Encoder parameters for one transcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TranscodeTarget {
    /// Constant-quality video encode
    Video {
        /// Constant rate factor
        crf: u8,
        /// Encoder effort preset
        preset: String,
    },
    /// Fixed-bitrate audio encode
    Audio {
        /// Target bitrate in kbit/s
        bitrate_kbps: u32,
    },
}

impl TranscodeTarget {
    /// Output options placed between the input and the output path
    pub fn to_args(&self) -> Vec<String> {
        match self {
            TranscodeTarget::Video { crf, preset } => vec![
                "-crf".to_string(),
                crf.to_string(),
                "-preset".to_string(),
                preset.clone(),
            ],
            TranscodeTarget::Audio { bitrate_kbps } => {
                vec!["-b:a".to_string(), format!("{}k", bitrate_kbps)]
            }
        }
    }
}

/// Result of a successful probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscoderInfo {
    /// Binary that was executed
    pub binary: String,
    /// First line of `-version` output
    pub version: String,
}

/// Bounded runner for the external transcoder
#[derive(Debug, Clone)]
pub struct Transcoder {
    config: Arc<TranscoderConfig>,
    permits: Arc<Semaphore>,
}

impl Transcoder {
    /// Create a runner; a `max_concurrent` of zero is treated as one
    pub fn new(config: TranscoderConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            config: Arc::new(config),
            permits,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Permits not currently held by a running transcode
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Transcode `input` into `output`
    ///
    /// Waits for a permit first. The output container is chosen by the
    /// transcoder from the output path's extension.
    pub async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: &TranscodeTarget,
    ) -> StrategyResult<()> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| StrategyError::PoolClosed)?;

        let mut command = Command::new(&self.config.binary);
        command
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"])
            .arg(input)
            .args(target.to_args())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            binary = %self.config.binary.display(),
            input = %input.display(),
            output = %output.display(),
            ?target,
            "Spawning transcoder"
        );

        let start = Instant::now();
        let child = command.spawn().map_err(StrategyError::TranscoderSpawn)?;

        let result = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.config.timeout, "Transcoder timed out, killing");
                return Err(StrategyError::TranscoderTimeout(self.config.timeout));
            }
        };
        let output_status = result.map_err(StrategyError::TranscoderSpawn)?;

        if !output_status.status.success() {
            return Err(StrategyError::TranscoderExit {
                status: output_status.status.to_string(),
                stderr: stderr_tail(&output_status.stderr),
            });
        }

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Transcode finished");
        Ok(())
    }

    /// Run `<binary> -version` and report the first line
    pub async fn probe(&self) -> StrategyResult<TranscoderInfo> {
        let mut command = Command::new(&self.config.binary);
        command
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(StrategyError::TranscoderSpawn)?;
        let timeout = PROBE_TIMEOUT.min(self.config.timeout);
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| StrategyError::TranscoderTimeout(timeout))?
            .map_err(StrategyError::TranscoderSpawn)?;

        if !output.status.success() {
            return Err(StrategyError::TranscoderExit {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = stdout.lines().next().unwrap_or_default().trim().to_string();

        Ok(TranscoderInfo {
            binary: self.config.binary.display().to_string(),
            version,
        })
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(TranscoderConfig::default())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_video_args() {
        let target = TranscodeTarget::Video {
            crf: 36,
            preset: "veryslow".to_string(),
        };
        assert_eq!(target.to_args(), vec!["-crf", "36", "-preset", "veryslow"]);
    }

    #[test]
    fn test_audio_args() {
        let target = TranscodeTarget::Audio { bitrate_kbps: 64 };
        assert_eq!(target.to_args(), vec!["-b:a", "64k"]);
    }

    #[test]
    fn test_zero_concurrency_becomes_one() {
        let transcoder = Transcoder::new(TranscoderConfig {
            max_concurrent: 0,
            ..TranscoderConfig::default()
        });
        assert_eq!(transcoder.available_permits(), 1);
    }

    #[test]
    fn test_stderr_tail_truncates() {
        let long = "x".repeat(STDERR_TAIL + 100);
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.starts_with("..."));
        assert_eq!(tail.len(), STDERR_TAIL + 3);
        assert_eq!(stderr_tail(b"  short\n"), "short");
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_spawn() {
        let transcoder =
            Transcoder::new(TranscoderConfig::with_binary("/nonexistent/filepress-ffmpeg"));

        let probe = transcoder.probe().await;
        assert!(matches!(probe, Err(StrategyError::TranscoderSpawn(_))));

        let result = transcoder
            .transcode(
                Path::new("in.mp4"),
                Path::new("out.mp4"),
                &TranscodeTarget::Audio { bitrate_kbps: 64 },
            )
            .await;
        assert!(matches!(result, Err(StrategyError::TranscoderSpawn(_))));
        assert_eq!(transcoder.available_permits(), transcoder.config().max_concurrent);
    }
}
