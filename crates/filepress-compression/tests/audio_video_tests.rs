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

#![cfg(unix)]
#![allow(clippy::unwrap_used)]
//! Audio/video strategy against a stub transcoder
//!
//! The stub is a shell script, so these tests only run on unix.

use filepress_compression::{
    CodecSettings, CompressionOrchestrator, Mode, StrategyRegistry, TempResourceManager,
    Transcoder, TranscoderConfig, UploadArtifact,
};
use filepress_test_utils::{leftover_temp_files, StubBehavior, StubTranscoder};
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct Harness {
    stub: StubTranscoder,
    temp: TempDir,
    orchestrator: CompressionOrchestrator,
}

fn harness(behavior: StubBehavior, max_concurrent: usize, timeout: Duration) -> Harness {
    let stub = StubTranscoder::new(behavior);
    let temp = TempDir::new().unwrap();
    let transcoder = Transcoder::new(TranscoderConfig {
        binary: stub.path().to_path_buf(),
        max_concurrent,
        timeout,
    });
    let registry = StrategyRegistry::new(transcoder, TempResourceManager::new(temp.path()));
    Harness {
        stub,
        temp,
        orchestrator: CompressionOrchestrator::new(registry),
    }
}

fn video(mode: Mode) -> UploadArtifact {
    UploadArtifact::new(b"fake mp4 payload".to_vec(), "video/mp4", "clip.mp4", mode)
}

#[tokio::test]
async fn video_uses_crf_and_preset() {
    let h = harness(StubBehavior::Copy, 2, Duration::from_secs(30));

    let out = h.orchestrator.run(video(Mode::Max)).await.unwrap();

    assert_eq!(&out.bytes[..], b"fake mp4 payload");
    assert_eq!(out.content_type, "video/mp4");
    assert_eq!(
        out.report.settings,
        CodecSettings::Video {
            crf: 36,
            preset: "veryslow".to_string()
        }
    );

    let calls = h.stub.invocations();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("-crf 36 -preset veryslow"));
    assert!(calls[0].contains("-nostdin"));
    assert!(calls[0].ends_with(".mp4"));
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
}

#[tokio::test]
async fn audio_uses_bitrate_instead_of_crf() {
    let h = harness(StubBehavior::Copy, 2, Duration::from_secs(30));

    let song = UploadArtifact::new(b"ID3 fake".to_vec(), "audio/mpeg", "song.mp3", Mode::Quality);
    let out = h.orchestrator.run(song).await.unwrap();

    assert_eq!(out.report.settings, CodecSettings::Audio { bitrate_kbps: 192 });
    let calls = h.stub.invocations();
    assert!(calls[0].contains("-b:a 192k"));
    assert!(!calls[0].contains("-crf"));
}

#[tokio::test]
async fn missing_extension_falls_back_to_declared_type() {
    let h = harness(StubBehavior::Copy, 1, Duration::from_secs(30));

    let upload = UploadArtifact::new(b"webm".to_vec(), "video/webm", "recording", Mode::Quality);
    h.orchestrator.run(upload).await.unwrap();

    assert!(h.stub.invocations()[0].ends_with(".webm"));
}

#[tokio::test]
async fn unknown_container_fails_without_temp_files() {
    let h = harness(StubBehavior::Copy, 1, Duration::from_secs(30));

    let upload = UploadArtifact::new(b"???".to_vec(), "video/x-unknown", "blob", Mode::Quality);
    let err = h.orchestrator.run(upload).await.unwrap_err();

    assert!(err.is_compression_failed());
    assert!(h.stub.invocations().is_empty());
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
}

#[tokio::test]
async fn corrupt_video_fails_and_cleans_up() {
    let h = harness(StubBehavior::Fail, 2, Duration::from_secs(30));

    let err = h.orchestrator.run(video(Mode::Quality)).await.unwrap_err();

    assert!(err.is_compression_failed());
    assert!(err.to_string().contains("Invalid data found"));
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
}

#[tokio::test]
async fn empty_output_is_a_failure() {
    let h = harness(StubBehavior::Empty, 2, Duration::from_secs(30));

    let err = h.orchestrator.run(video(Mode::Quality)).await.unwrap_err();

    assert!(err.to_string().contains("no output"));
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
}

#[tokio::test]
async fn timeout_kills_transcoder_and_cleans_up() {
    let h = harness(StubBehavior::Sleep(30), 1, Duration::from_millis(300));

    let start = Instant::now();
    let err = h.orchestrator.run(video(Mode::Quality)).await.unwrap_err();

    assert!(err.to_string().contains("timed out"));
    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
    assert_eq!(h.orchestrator.transcoder().available_permits(), 1);
}

#[tokio::test]
async fn dropped_request_cleans_up() {
    let h = harness(StubBehavior::Sleep(30), 1, Duration::from_secs(60));

    let result = tokio::time::timeout(
        Duration::from_millis(300),
        h.orchestrator.run(video(Mode::Quality)),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(leftover_temp_files(h.temp.path()), 0);
    assert_eq!(h.orchestrator.transcoder().available_permits(), 1);
}

#[tokio::test]
async fn concurrent_mixed_runs_leave_no_temp_files() {
    let ok = harness(StubBehavior::Copy, 3, Duration::from_secs(30));
    let failing = harness(StubBehavior::Fail, 3, Duration::from_secs(30));

    let mut handles = Vec::new();
    for i in 0..12 {
        let orchestrator = if i % 2 == 0 {
            ok.orchestrator.clone()
        } else {
            failing.orchestrator.clone()
        };
        handles.push(tokio::spawn(async move {
            orchestrator.run(video(Mode::Quality)).await.is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 6);
    assert_eq!(leftover_temp_files(ok.temp.path()), 0);
    assert_eq!(leftover_temp_files(failing.temp.path()), 0);
    assert_eq!(ok.orchestrator.transcoder().available_permits(), 3);
}

#[tokio::test]
async fn permit_pool_serializes_transcodes() {
    let h = harness(StubBehavior::Sleep(1), 1, Duration::from_secs(30));

    let start = Instant::now();
    let (a, b) = tokio::join!(
        h.orchestrator.run(video(Mode::Quality)),
        h.orchestrator.run(video(Mode::Max)),
    );

    assert!(a.is_ok() && b.is_ok());
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn probe_reports_first_version_line() {
    let stub = StubTranscoder::new(StubBehavior::Copy);
    let transcoder = Transcoder::new(TranscoderConfig::with_binary(stub.path()));

    let info = transcoder.probe().await.unwrap();

    assert!(info.version.starts_with("ffmpeg version 6.1-stub"));
    assert_eq!(info.binary, stub.path().display().to_string());
}
