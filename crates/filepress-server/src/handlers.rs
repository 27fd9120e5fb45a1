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


//! HTTP request handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use filepress_compression::artifact::FALLBACK_CONTENT_TYPE;
use filepress_compression::{estimate, CompressedArtifact, SizeEstimate, UploadArtifact};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Multipart field carrying the upload
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the mode
pub const MODE_FIELD: &str = "mode";

/// Name used when the upload part has no file name
const UNNAMED_UPLOAD: &str = "upload";

/// Report header names
pub mod headers {
    /// Classification bucket
    pub const CATEGORY: &str = "x-filepress-category";
    /// Strategy that ran
    pub const STRATEGY: &str = "x-filepress-strategy";
    /// Codec parameters
    pub const SETTINGS: &str = "x-filepress-settings";
    /// Input size in bytes
    pub const ORIGINAL_SIZE: &str = "x-filepress-original-size";
    /// Output size in bytes
    pub const COMPRESSED_SIZE: &str = "x-filepress-compressed-size";
    /// original / compressed
    pub const RATIO: &str = "x-filepress-ratio";
    /// Strategy wall time
    pub const ELAPSED_MS: &str = "x-filepress-elapsed-ms";
}

/// Compress an uploaded file
///
/// POST /api/compress
pub async fn compress(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.max_upload_bytes;
    let mut upload = None;
    let mut mode = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or(UNNAMED_UPLOAD).to_string();
                let declared_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                upload = Some((bytes, declared_type, file_name));
            }
            Some(MODE_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                mode = Some(value);
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let (bytes, declared_type, file_name) =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    let mode = state.mode_for(mode.as_deref());

    let artifact = UploadArtifact::new(bytes, declared_type, file_name, mode);
    let compressed = state.orchestrator.run(artifact).await?;

    Ok((StatusCode::OK, response_headers(&compressed)?, compressed.bytes))
}

fn response_headers(artifact: &CompressedArtifact) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();

    let content_type = HeaderValue::from_bytes(artifact.header_content_type().as_bytes())
        .unwrap_or_else(|_| {
            warn!(content_type = %artifact.content_type, "Declared type is not a valid header value");
            HeaderValue::from_static(FALLBACK_CONTENT_TYPE)
        });
    map.insert(CONTENT_TYPE, content_type);
    map.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_bytes(artifact.content_disposition().as_bytes())
            .map_err(|e| ApiError::Internal(format!("invalid file name header: {}", e)))?,
    );

    let report = &artifact.report;
    let values = [
        (headers::CATEGORY, report.category.to_string()),
        (headers::STRATEGY, report.strategy.to_string()),
        (headers::SETTINGS, report.settings.to_string()),
        (headers::ORIGINAL_SIZE, report.original_size.to_string()),
        (headers::COMPRESSED_SIZE, report.compressed_size.to_string()),
        (headers::RATIO, format!("{:.3}", report.ratio())),
        (headers::ELAPSED_MS, report.elapsed.as_millis().to_string()),
    ];
    for (name, value) in values {
        let value = HeaderValue::from_str(&value)
            .map_err(|e| ApiError::Internal(format!("invalid {} header: {}", name, e)))?;
        map.insert(HeaderName::from_static(name), value);
    }

    Ok(map)
}

/// Query for [`estimate_size`]
#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    /// File name, used for the extension
    #[serde(default)]
    pub name: String,

    /// Declared media type
    #[serde(default, rename = "type")]
    pub declared_type: String,

    /// Upload size in bytes
    pub size: u64,
}

/// Estimated output sizes for both modes
///
/// GET /api/estimate?name=&type=&size=
pub async fn estimate_size(Query(query): Query<EstimateQuery>) -> Json<SizeEstimate> {
    Json(estimate(&query.declared_type, &query.name, query.size))
}

/// Transcoder probe result
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscoderStatus {
    /// Binary that was run
    pub binary: String,
    /// First line of `-version` output
    pub version: String,
    /// Permit pool size
    pub max_concurrent: usize,
    /// Permits currently free
    pub available_permits: usize,
}

/// Probe the transcoder binary
///
/// GET /api/transcoder
pub async fn transcoder_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TranscoderStatus>, ApiError> {
    let transcoder = state.orchestrator.transcoder();
    let info = transcoder
        .probe()
        .await
        .map_err(|e| ApiError::TranscoderUnavailable(e.to_string()))?;

    Ok(Json(TranscoderStatus {
        binary: info.binary,
        version: info.version,
        max_concurrent: transcoder.config().max_concurrent.max(1),
        available_permits: transcoder.available_permits(),
    }))
}

/// Liveness check
///
/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
