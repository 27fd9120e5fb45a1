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


//! HTTP surface tests against a bound server

#![allow(clippy::unwrap_used)]

use filepress_compression::{
    CompressionOrchestrator, Mode, StrategyRegistry, TempResourceManager, TextStrategy, Transcoder,
    TranscoderConfig,
};
use filepress_server::{create_router, AppState};
use filepress_test_utils::TestFixtures;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::oneshot;

const MIB: u64 = 1024 * 1024;

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    #[cfg_attr(not(unix), allow(dead_code))]
    temp: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(Path::new("/nonexistent/ffmpeg"), Mode::Quality, 16 * MIB).await
    }

    async fn start_with(ffmpeg: &Path, default_mode: Mode, max_upload_bytes: u64) -> Self {
        let temp = TempDir::new().unwrap();
        let registry = StrategyRegistry::new(
            Transcoder::new(TranscoderConfig {
                max_concurrent: 2,
                ..TranscoderConfig::with_binary(ffmpeg)
            }),
            TempResourceManager::new(temp.path()),
        );
        let state = AppState::new(
            CompressionOrchestrator::new(registry),
            default_mode,
            max_upload_bytes,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(Arc::new(state));
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            temp,
            shutdown: Some(tx),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn compress(&self, form: Form) -> reqwest::Response {
        self.client
            .post(self.url("/api/compress"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn file_part(data: Vec<u8>, name: &str, mime: &str) -> Part {
    Part::bytes(data).file_name(name.to_string()).mime_str(mime).unwrap()
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> &'a str {
    response.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let response = server.client.get(server.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_compress_text_returns_brotli_with_original_headers() {
    let server = TestServer::start().await;
    let text = TestFixtures::text(32 * 1024);
    let form = Form::new()
        .part("file", file_part(text.clone(), "notes.txt", "text/plain"))
        .text("mode", "MAX");

    let response = server.compress(form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "text/plain");
    assert_eq!(
        header(&response, "content-disposition"),
        "attachment; filename=\"notes.txt\""
    );
    assert_eq!(header(&response, "x-filepress-category"), "text");
    assert_eq!(header(&response, "x-filepress-strategy"), "text");
    assert_eq!(
        header(&response, "x-filepress-settings"),
        "brotli quality 11 window 22"
    );
    assert_eq!(
        header(&response, "x-filepress-original-size"),
        text.len().to_string()
    );

    let body = response.bytes().await.unwrap();
    assert!(body.len() < text.len());
    assert_eq!(TextStrategy::decompress(&body).unwrap(), text);
}

#[tokio::test]
async fn test_compress_uses_default_mode_without_mode_field() {
    let server = TestServer::start_with(Path::new("/nonexistent/ffmpeg"), Mode::Max, 16 * MIB).await;
    let form = Form::new().part(
        "file",
        file_part(TestFixtures::binary(4096), "blob.bin", "application/x-custom"),
    );

    let response = server.compress(form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-filepress-settings"), "zstd level 20");
}

#[tokio::test]
async fn test_compress_png_keeps_png() {
    let server = TestServer::start().await;
    let form = Form::new()
        .part("file", file_part(TestFixtures::png(64, 48), "pic.png", "image/png"))
        .text("mode", "quality");

    let response = server.compress(form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "image/png");
    assert_eq!(header(&response, "x-filepress-settings"), "png level 6");

    let body = response.bytes().await.unwrap();
    assert!(body.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[tokio::test]
async fn test_untyped_upload_falls_back_to_octet_stream() {
    let server = TestServer::start().await;
    let part = Part::bytes(b"abcabcabc".repeat(64)).file_name("mystery");
    let response = server.compress(Form::new().part("file", part)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "application/octet-stream");
    assert_eq!(header(&response, "x-filepress-strategy"), "generic_binary");
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let server = TestServer::start().await;
    let response = server.compress(Form::new().text("mode", "max")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_empty_file_is_bad_request() {
    let server = TestServer::start().await;
    let form = Form::new().part("file", file_part(Vec::new(), "empty.txt", "text/plain"));
    let response = server.compress(form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_corrupt_image_is_server_error() {
    let server = TestServer::start().await;
    let form = Form::new().part(
        "file",
        file_part(b"definitely not a png".to_vec(), "broken.png", "image/png"),
    );
    let response = server.compress(form).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Compression failed");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("image decode failed"));
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let server = TestServer::start_with(Path::new("/nonexistent/ffmpeg"), Mode::Quality, 1024).await;
    let form = Form::new().part(
        "file",
        file_part(TestFixtures::binary(8192), "big.bin", "application/octet-stream"),
    );
    let response = server.compress(form).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_security_headers_present() {
    let server = TestServer::start().await;
    let response = server.client.get(server.url("/health")).send().await.unwrap();

    assert_eq!(header(&response, "x-content-type-options"), "nosniff");
    assert_eq!(header(&response, "x-frame-options"), "DENY");
    assert_eq!(header(&response, "cache-control"), "no-store");
}

#[tokio::test]
async fn test_estimate_endpoint() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.url("/api/estimate"))
        .query(&[("name", "clip.mp4"), ("type", "video/mp4"), ("size", "1000")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["class"], "video");
    assert_eq!(body["original_size"], 1000);
    assert_eq!(body["quality"], 700);
    assert_eq!(body["max"], 400);
}

#[tokio::test]
async fn test_estimate_requires_size() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.url("/api/estimate?name=a.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transcoder_unavailable() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.url("/api/transcoder"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Transcoder unavailable");
}

#[cfg(unix)]
mod with_stub_transcoder {
    use super::*;
    use filepress_test_utils::{leftover_temp_files, StubBehavior, StubTranscoder};

    #[tokio::test]
    async fn test_transcoder_probe() {
        let stub = StubTranscoder::new(StubBehavior::Copy);
        let server = TestServer::start_with(stub.path(), Mode::Quality, 16 * MIB).await;
        let response = server
            .client
            .get(server.url("/api/transcoder"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert!(body["version"].as_str().unwrap().contains("6.1-stub"));
        assert_eq!(body["max_concurrent"], 2);
        assert_eq!(body["available_permits"], 2);
    }

    #[tokio::test]
    async fn test_video_upload_is_transcoded() {
        let stub = StubTranscoder::new(StubBehavior::Copy);
        let server = TestServer::start_with(stub.path(), Mode::Quality, 16 * MIB).await;
        let video = TestFixtures::binary(2048);
        let form = Form::new()
            .part("file", file_part(video.clone(), "clip.mp4", "video/mp4"))
            .text("mode", "max");

        let response = server.compress(form).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "content-type"), "video/mp4");
        assert_eq!(
            header(&response, "x-filepress-settings"),
            "video crf 36 preset veryslow"
        );
        assert_eq!(response.bytes().await.unwrap().to_vec(), video);

        let calls = stub.invocations();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("-crf 36"));
        assert_eq!(leftover_temp_files(server.temp.path()), 0);
    }

    #[tokio::test]
    async fn test_failed_transcode_is_server_error_and_cleans_up() {
        let stub = StubTranscoder::new(StubBehavior::Fail);
        let server = TestServer::start_with(stub.path(), Mode::Quality, 16 * MIB).await;
        let form = Form::new().part(
            "file",
            file_part(TestFixtures::binary(512), "song.mp3", "audio/mpeg"),
        );

        let response = server.compress(form).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("Invalid data found"));
        assert_eq!(leftover_temp_files(server.temp.path()), 0);
    }
}
