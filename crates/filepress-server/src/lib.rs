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


//! FilePress HTTP service
//!
//! Accepts multipart uploads, runs them through the compression dispatcher
//! and streams back the result under the original type and file name.
//!
//! # Endpoints
//!
//! - `POST /api/compress`: fields `file` (required) and `mode` (`quality` or `max`)
//! - `GET /api/estimate?name=&type=&size=`: expected output sizes
//! - `GET /api/transcoder`: probe the configured `ffmpeg`
//! - `GET /health`: liveness

pub mod error;
pub mod handlers;
pub mod security;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Create the axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(state.max_upload_bytes).unwrap_or(usize::MAX);

    Router::new()
        .route("/api/compress", post(handlers::compress))
        .route("/api/estimate", get(handlers::estimate_size))
        .route("/api/transcoder", get(handlers::transcoder_status))
        .route("/health", get(handlers::health))
        // The configured limit replaces axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security::security_headers_middleware))
                .layer(middleware::from_fn_with_state(
                    Arc::clone(&state),
                    security::upload_limit_middleware,
                ))
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state)
}
