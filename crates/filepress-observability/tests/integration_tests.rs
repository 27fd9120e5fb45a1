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


//! Configuration building tests
//!
//! The global subscriber is installed in `init_once.rs`, which runs in its
//! own process.

#![allow(clippy::unwrap_used)]

use filepress_observability::{LogConfig, LogError, LogFormat, LogOutput};

#[test]
fn test_config_builder_chaining() {
    let config = LogConfig::new()
        .with_format(LogFormat::Json)
        .with_level("debug")
        .with_timestamps(false)
        .with_color(false)
        .with_targets(false)
        .with_span_timings(true)
        .with_output(LogOutput::Stdout);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level.as_deref(), Some("debug"));
    assert!(!config.use_timestamps);
    assert!(!config.use_color);
    assert!(!config.include_targets);
    assert!(config.span_timings);
    assert_eq!(config.output, LogOutput::Stdout);
}

#[test]
fn test_default_config() {
    let config = LogConfig::default();
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.output, LogOutput::Stderr);
    assert!(config.use_color);
    assert!(config.use_timestamps);
    assert!(!config.span_timings);
}

#[test]
fn test_explicit_level_beats_environment() {
    let config = LogConfig::new().with_level("warn");
    assert_eq!(config.get_effective_level(), "warn");
}

#[test]
fn test_settings_from_config_file_values() {
    let config = LogConfig::from_settings("debug", "Pretty")
        .unwrap()
        .with_verbosity(false, true);
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.level.as_deref(), Some("error"));
}

#[test]
fn test_unknown_format_message() {
    let err = LogConfig::from_settings("info", "yaml").unwrap_err();
    assert!(matches!(err, LogError::InvalidFormat(_)));
    assert!(err.to_string().contains("pretty, compact, json"));
}
