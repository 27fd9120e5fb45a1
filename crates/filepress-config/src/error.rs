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


//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating FilePress configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("cannot read FilePress config: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document does not match the config schema
    #[error("invalid TOML in FilePress config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The YAML document does not match the config schema
    #[error("invalid YAML in FilePress config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document does not match the config schema
    #[error("invalid JSON in FilePress config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is not one of toml, yaml, yml or json
    #[error("config file extension '.{0}' is not supported (use .toml, .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// `--config` / `FILEPRESS_CONFIG` points at nothing
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The path has no extension to pick a parser from
    #[error("config file {} has no extension; cannot tell its format", .0.display())]
    NoExtension(PathBuf),

    /// A `FILEPRESS_*` override could not be parsed
    #[error("{variable}={value:?} is not valid: expected {expected}")]
    EnvOverride {
        /// Variable name, e.g. `FILEPRESS_PORT`
        variable: String,
        /// Raw value from the environment
        value: String,
        /// What the variable accepts
        expected: String,
    },

    /// A field holds a value outside its allowed range
    #[error("config field '{field}' is invalid: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `transcoder.max_concurrent`
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A required field is empty
    #[error("config field '{0}' must not be empty")]
    MissingRequired(String),
}

impl ConfigError {
    /// A `FILEPRESS_*` override that failed to parse
    pub fn env_override(
        variable: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ConfigError::EnvOverride {
            variable: variable.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// A field with an out-of-range value
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_names_variable() {
        let err = ConfigError::env_override("FILEPRESS_PORT", "eighty", "a port number");
        assert_eq!(
            err.to_string(),
            "FILEPRESS_PORT=\"eighty\" is not valid: expected a port number"
        );
    }

    #[test]
    fn test_invalid_value_names_field() {
        let err = ConfigError::invalid_value("transcoder.max_concurrent", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "config field 'transcoder.max_concurrent' is invalid: must be at least 1"
        );
    }
}
