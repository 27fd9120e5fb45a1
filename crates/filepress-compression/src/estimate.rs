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

//! Rough output size estimates shown before compressing
//!
//! These are fixed ratios per class, not predictions from the codecs. They
//! use a coarser grouping than [`crate::classify`].

use crate::classify::{extension_of, media_type_essence};
use crate::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping used for estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateClass {
    /// `image*`
    Image,
    /// `video*`
    Video,
    /// `audio*`
    Audio,
    /// `text*` or json, html, javascript
    Text,
    /// Office extensions
    Office,
    /// `.pdf`
    Pdf,
    /// `.zip`
    Zip,
    /// Anything else
    Other,
}

const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "xls", "xlsx", "ppt", "pptx", "mdb", "accdb"];

impl EstimateClass {
    /// Group an upload
    pub fn of(declared_type: &str, file_name: &str) -> Self {
        let mime = media_type_essence(declared_type);
        let ext = extension_of(file_name);

        if mime.starts_with("image") {
            EstimateClass::Image
        } else if mime.starts_with("video") {
            EstimateClass::Video
        } else if mime.starts_with("audio") {
            EstimateClass::Audio
        } else if mime.starts_with("text")
            || mime.contains("json")
            || mime.contains("html")
            || mime.contains("javascript")
        {
            EstimateClass::Text
        } else if OFFICE_EXTENSIONS.contains(&ext.as_str()) {
            EstimateClass::Office
        } else if ext == "pdf" {
            EstimateClass::Pdf
        } else if ext == "zip" {
            EstimateClass::Zip
        } else {
            EstimateClass::Other
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateClass::Image => "image",
            EstimateClass::Video => "video",
            EstimateClass::Audio => "audio",
            EstimateClass::Text => "text",
            EstimateClass::Office => "office",
            EstimateClass::Pdf => "pdf",
            EstimateClass::Zip => "zip",
            EstimateClass::Other => "other",
        }
    }

    /// Expected output/input ratio under `mode`
    pub fn ratio(self, mode: Mode) -> f64 {
        let (quality, max) = match self {
            EstimateClass::Image => (0.9, 0.5),
            EstimateClass::Video => (0.7, 0.4),
            EstimateClass::Audio => (0.8, 0.4),
            EstimateClass::Text => (0.7, 0.4),
            EstimateClass::Office | EstimateClass::Pdf | EstimateClass::Zip => (0.85, 0.5),
            EstimateClass::Other => (0.9, 0.6),
        };
        match mode {
            Mode::Quality => quality,
            Mode::Max => max,
        }
    }
}

impl fmt::Display for EstimateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated output sizes for both modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeEstimate {
    /// Class the estimate is based on
    pub class: EstimateClass,
    /// Input size in bytes
    pub original_size: u64,
    /// Estimated size in quality mode
    pub quality: u64,
    /// Estimated size in max mode
    pub max: u64,
}

impl SizeEstimate {
    /// Estimated size for `mode`
    pub fn for_mode(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Quality => self.quality,
            Mode::Max => self.max,
        }
    }
}

/// Estimate output sizes for an upload of `size` bytes
pub fn estimate(declared_type: &str, file_name: &str, size: u64) -> SizeEstimate {
    let class = EstimateClass::of(declared_type, file_name);
    let scale = |mode| (size as f64 * class.ratio(mode)).round() as u64;

    SizeEstimate {
        class,
        original_size: size,
        quality: scale(Mode::Quality),
        max: scale(Mode::Max),
    }
}
