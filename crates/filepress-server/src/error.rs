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


//! HTTP error responses

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filepress_compression::DispatchError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by handlers
///
/// Every variant renders as a JSON body `{"error": ..., "details": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or unreadable upload
    #[error("{0}")]
    BadRequest(String),

    /// Upload exceeds the configured limit
    #[error("Upload exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes
        limit: u64,
    },

    /// The selected strategy failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// The transcoder binary could not be run
    #[error("Transcoder unavailable: {0}")]
    TranscoderUnavailable(String),

    /// Response could not be assembled
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::CompressionFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::TranscoderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            ApiError::BadRequest(msg) => (msg.clone(), None),
            ApiError::PayloadTooLarge { .. } => ("Upload too large".to_string(), Some(self.to_string())),
            ApiError::CompressionFailed(msg) => ("Compression failed".to_string(), Some(msg.clone())),
            ApiError::TranscoderUnavailable(msg) => {
                ("Transcoder unavailable".to_string(), Some(msg.clone()))
            }
            ApiError::Internal(msg) => ("Internal error".to_string(), Some(msg.clone())),
        };
        ErrorBody { error, details }
    }

    /// Map a multipart read failure, keeping the body-limit status
    pub fn from_multipart(err: MultipartError, limit: u64) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { limit }
        } else {
            ApiError::BadRequest(format!("Failed to parse upload: {}", err.body_text()))
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Input(msg) => ApiError::BadRequest(msg),
            DispatchError::CompressionFailed(msg) => ApiError::CompressionFailed(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DispatchError::input("empty")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DispatchError::compression_failed("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::PayloadTooLarge { limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::TranscoderUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_compression_failure_body() {
        let body = ApiError::CompressionFailed("image decode failed".into()).body();
        assert_eq!(body.error, "Compression failed");
        assert_eq!(body.details.as_deref(), Some("image decode failed"));
    }
}
