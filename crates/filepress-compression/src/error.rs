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

//! Compression error types
//!
//! [`StrategyError`] describes what went wrong inside a single codec strategy.
//! It never crosses the orchestrator boundary: callers only ever see
//! [`DispatchError`].

use std::time::Duration;
use thiserror::Error;

/// Result type alias for strategy operations
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Result type alias for orchestrator operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised inside a codec strategy
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Image bytes could not be decoded
    #[error("image decode failed: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// Decoded image could not be re-encoded
    #[error("image encode failed: {0}")]
    ImageEncode(String),

    /// Transcoder binary could not be started
    #[error("transcoder could not be started: {0}")]
    TranscoderSpawn(#[source] std::io::Error),

    /// Transcoder ran but reported failure
    #[error("transcoder exited with {status}: {stderr}")]
    TranscoderExit {
        /// Exit status as reported by the OS
        status: String,
        /// Tail of the transcoder's stderr
        stderr: String,
    },

    /// Transcoder did not finish in time and was killed
    #[error("transcoder timed out after {0:?}")]
    TranscoderTimeout(Duration),

    /// Transcoder exited cleanly but wrote nothing
    #[error("transcoder produced no output")]
    EmptyOutput,

    /// No container extension could be derived for the transcoder output
    #[error("cannot determine container format for '{0}'")]
    UnknownContainer(String),

    /// I/O on a temporary path failed
    #[error("temporary file I/O failed: {0}")]
    TempIo(#[source] std::io::Error),

    /// Brotli stream failed
    #[error("brotli stream failed: {0}")]
    Brotli(#[source] std::io::Error),

    /// Zstandard stream failed
    #[error("zstd stream failed: {0}")]
    Zstd(#[source] std::io::Error),

    /// Blocking worker panicked or was cancelled
    #[error("worker task failed: {0}")]
    Worker(String),

    /// The transcoder permit pool was closed
    #[error("transcoder pool is closed")]
    PoolClosed,
}

impl StrategyError {
    /// Create an image encode error
    pub fn image_encode<S: Into<String>>(msg: S) -> Self {
        StrategyError::ImageEncode(msg.into())
    }

    /// Create a worker error
    pub fn worker<S: Into<String>>(msg: S) -> Self {
        StrategyError::Worker(msg.into())
    }

    /// Check if the failure came from the external transcoder
    pub fn is_transcoder(&self) -> bool {
        matches!(
            self,
            StrategyError::TranscoderSpawn(_)
                | StrategyError::TranscoderExit { .. }
                | StrategyError::TranscoderTimeout(_)
                | StrategyError::EmptyOutput
        )
    }
}

/// Errors returned to callers of the orchestrator
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Caller supplied no usable input
    #[error("invalid input: {0}")]
    Input(String),

    /// The selected strategy failed
    #[error("compression failed: {0}")]
    CompressionFailed(String),
}

impl DispatchError {
    /// Create an input error
    pub fn input<S: Into<String>>(msg: S) -> Self {
        DispatchError::Input(msg.into())
    }

    /// Create a compression failed error
    pub fn compression_failed<S: Into<String>>(msg: S) -> Self {
        DispatchError::CompressionFailed(msg.into())
    }

    /// Check if this is a caller error
    pub fn is_input(&self) -> bool {
        matches!(self, DispatchError::Input(_))
    }

    /// Check if this is a compression failure
    pub fn is_compression_failed(&self) -> bool {
        matches!(self, DispatchError::CompressionFailed(_))
    }
}

impl From<StrategyError> for DispatchError {
    fn from(err: StrategyError) -> Self {
        DispatchError::compression_failed(err.to_string())
    }
}
