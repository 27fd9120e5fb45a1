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


//! Logging for FilePress binaries
//!
//! Thin layer over `tracing-subscriber` that turns the `observability`
//! config section and CLI verbosity flags into one global subscriber.
//!
//! ```no_run
//! use filepress_observability::{init_tracing_with_config, LogConfig};
//!
//! let config = LogConfig::from_settings("info", "json")
//!     .unwrap()
//!     .with_verbosity(false, false);
//! init_tracing_with_config(config).unwrap();
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat, LogOutput};
pub use initialization::{init_tracing, init_tracing_with_config};
