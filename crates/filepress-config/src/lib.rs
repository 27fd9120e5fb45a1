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


//! Configuration management for FilePress
//!
//! Multi-format (TOML, YAML, JSON) configuration with `FILEPRESS_*`
//! environment overrides and validation.
//!
//! # Example
//!
//! ```no_run
//! use filepress_config::ConfigLoader;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .load(Some(Path::new("filepress.toml")))
//!         .await?;
//!
//!     println!("Listening on {}", config.server.bind_addr());
//!     println!("Transcoder: {}", config.transcoder.binary);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used items
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, ENV_PREFIX};
pub use schema::*;
pub use validation::Validator;
