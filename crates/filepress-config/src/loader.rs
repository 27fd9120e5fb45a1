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


use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::validation::Validator;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "FILEPRESS_";

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML
    Toml,
    /// YAML
    Yaml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::NoExtension(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;

        info!(
            "Loaded {} configuration file: {}",
            format.name(),
            path.display()
        );

        self.load_from_string(&content, format)
    }

    /// Load configuration from a string
    pub fn load_from_string(&self, content: &str, format: ConfigFormat) -> ConfigResult<Config> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        debug!("Configuration loaded from {}", format.name());

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Load an optional file, then apply environment overrides
    ///
    /// Without a path the built-in defaults are used. Validation runs after
    /// the overrides, so an override can fix or break a file value.
    pub async fn load(&self, path: Option<&Path>) -> ConfigResult<Config> {
        let mut config = match path {
            Some(path) => Self::without_validation().load_file(path).await?,
            None => Config::default(),
        };
        self.apply_env_overrides(&mut config)?;

        if self.validate {
            config.validate()?;
            info!("Configuration validated successfully");
        }

        Ok(config)
    }

    /// Apply `FILEPRESS_*` environment variable overrides
    pub fn apply_env_overrides(&self, config: &mut Config) -> ConfigResult<()> {
        self.apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup (tests pass a map here)
    pub fn apply_overrides_from<F>(&self, config: &mut Config, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server settings
        if let Some(value) = lookup("FILEPRESS_HOST") {
            config.server.host = value;
        }
        if let Some(value) = lookup("FILEPRESS_PORT") {
            config.server.port = parse_number("FILEPRESS_PORT", &value, "a port number (1-65535)")?;
        }
        if let Some(value) = lookup("FILEPRESS_MAX_UPLOAD_BYTES") {
            config.server.max_upload_bytes =
                parse_number("FILEPRESS_MAX_UPLOAD_BYTES", &value, "a byte count")?;
        }

        // Compression settings
        if let Some(value) = lookup("FILEPRESS_DEFAULT_MODE") {
            config.compression.default_mode = value;
        }
        if let Some(value) = lookup("FILEPRESS_TEMP_DIR") {
            config.compression.temp_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }

        // Transcoder settings
        if let Some(value) = lookup("FILEPRESS_FFMPEG") {
            config.transcoder.binary = value;
        }
        if let Some(value) = lookup("FILEPRESS_MAX_TRANSCODES") {
            config.transcoder.max_concurrent =
                parse_number("FILEPRESS_MAX_TRANSCODES", &value, "a whole number")?;
        }
        if let Some(value) = lookup("FILEPRESS_TRANSCODE_TIMEOUT") {
            config.transcoder.timeout_secs =
                parse_number("FILEPRESS_TRANSCODE_TIMEOUT", &value, "whole seconds")?;
        }

        // Observability settings
        if let Some(value) = lookup("FILEPRESS_LOG_LEVEL") {
            config.observability.log_level = value;
        }
        if let Some(value) = lookup("FILEPRESS_LOG_FORMAT") {
            config.observability.log_format = value;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number<T: std::str::FromStr>(variable: &str, value: &str, reason: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_override(variable, value, reason))
}
