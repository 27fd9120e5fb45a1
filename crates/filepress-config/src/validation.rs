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
use crate::schema::*;

/// Upper bound for `transcoder.max_concurrent`
pub const MAX_CONCURRENT_TRANSCODES: usize = 256;

/// Accepted values for `compression.default_mode`
pub const VALID_MODES: [&str; 2] = ["quality", "max"];

/// Accepted values for `observability.log_format`
pub const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Validator for configuration settings
pub trait Validator {
    /// Check the section, returning the first problem found
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.compression.validate()?;
        self.transcoder.validate()?;
        self.observability.validate()?;
        Ok(())
    }
}

impl Validator for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired("server.host".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::invalid_value(
                "server.port",
                format!("port must be between 1 and 65535, got {}", self.port),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_upload_bytes",
                "must be greater than 0",
            ));
        }

        if usize::try_from(self.max_upload_bytes).is_err() {
            return Err(ConfigError::invalid_value(
                "server.max_upload_bytes",
                "does not fit in memory on this platform",
            ));
        }

        Ok(())
    }
}

impl Validator for CompressionConfig {
    fn validate(&self) -> ConfigResult<()> {
        let mode = self.default_mode.trim().to_ascii_lowercase();
        if !VALID_MODES.contains(&mode.as_str()) {
            return Err(ConfigError::invalid_value(
                "compression.default_mode",
                format!("must be one of: {}", VALID_MODES.join(", ")),
            ));
        }

        if let Some(dir) = &self.temp_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::invalid_value(
                    "compression.temp_dir",
                    "must not be empty when set",
                ));
            }
        }

        Ok(())
    }
}

impl Validator for TranscoderConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.binary.trim().is_empty() {
            return Err(ConfigError::MissingRequired("transcoder.binary".to_string()));
        }

        if self.max_concurrent == 0 || self.max_concurrent > MAX_CONCURRENT_TRANSCODES {
            return Err(ConfigError::invalid_value(
                "transcoder.max_concurrent",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_CONCURRENT_TRANSCODES, self.max_concurrent
                ),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "transcoder.timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validator for ObservabilityConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::MissingRequired(
                "observability.log_level".to_string(),
            ));
        }

        let format = self.log_format.to_ascii_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::invalid_value(
                "observability.log_format",
                format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_server_rules() {
        let server = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(server.validate(), Err(ConfigError::InvalidValue { .. })));

        let server = ServerConfig {
            host: "  ".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(server.validate(), Err(ConfigError::MissingRequired(_))));

        let server = ServerConfig {
            max_upload_bytes: 0,
            ..ServerConfig::default()
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_mode_rules() {
        let upper = CompressionConfig {
            default_mode: "MAX".to_string(),
            temp_dir: None,
        };
        assert!(upper.validate().is_ok());

        let unknown = CompressionConfig {
            default_mode: "turbo".to_string(),
            temp_dir: None,
        };
        assert!(unknown.validate().is_err());

        let empty_dir = CompressionConfig {
            default_mode: "quality".to_string(),
            temp_dir: Some(PathBuf::new()),
        };
        assert!(empty_dir.validate().is_err());
    }

    #[test]
    fn test_transcoder_rules() {
        let with = |max_concurrent: usize, timeout_secs: u64, binary: &str| TranscoderConfig {
            binary: binary.to_string(),
            max_concurrent,
            timeout_secs,
        };

        assert!(with(0, 600, "ffmpeg").validate().is_err());
        assert!(with(MAX_CONCURRENT_TRANSCODES, 600, "ffmpeg").validate().is_ok());
        assert!(with(MAX_CONCURRENT_TRANSCODES + 1, 600, "ffmpeg").validate().is_err());
        assert!(with(4, 0, "ffmpeg").validate().is_err());
        assert!(with(4, 600, "").validate().is_err());
    }

    #[test]
    fn test_log_format_rules() {
        for format in ["pretty", "compact", "JSON"] {
            let observability = ObservabilityConfig {
                log_level: "info".to_string(),
                log_format: format.to_string(),
            };
            assert!(observability.validate().is_ok(), "{}", format);
        }

        let text = ObservabilityConfig {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        };
        assert!(text.validate().is_err());
    }
}
