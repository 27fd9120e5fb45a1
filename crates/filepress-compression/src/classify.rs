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

//! Upload classification
//!
//! Maps a declared media type and a file name to a [`Category`]. The mapping
//! is total: anything unrecognized is [`Category::Generic`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// High-level classification that selects a compression strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Raster images, re-encoded in memory
    Image,
    /// Audio and video, transcoded externally
    AudioVideo,
    /// Text, code and markup
    Text,
    /// Office documents, PDFs and archives
    OfficeOrArchiveOrPdf,
    /// Anything else
    Generic,
}

impl Category {
    /// All categories, in classification precedence order
    pub const ALL: [Category; 5] = [
        Category::Image,
        Category::AudioVideo,
        Category::Text,
        Category::OfficeOrArchiveOrPdf,
        Category::Generic,
    ];

    /// Stable snake_case name
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::AudioVideo => "audio_video",
            Category::Text => "text",
            Category::OfficeOrArchiveOrPdf => "office_or_archive_or_pdf",
            Category::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TEXT_TYPES: &[&str] = &[
    "application/json",
    "text/plain",
    "text/html",
    "application/javascript",
    "text/css",
    "text/markdown",
];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/zip",
    "application/x-msdownload",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

const OFFICE_EXTENSIONS: &[&str] = &[
    "doc", "docx", "dot", "dotx", // word processing
    "xls", "xlsx", "xlt", "xltx", // spreadsheets
    "ppt", "pptx", "pot", "potx", "pps", "ppsx", // presentations
    "pub", "accdb", "mdb", // publisher and databases
];

/// Classify an upload
///
/// Rules are evaluated in order: `image/*`, then `video/*` or `audio/*`, then
/// the text type list, then the document type list or office extension list.
/// Whatever is left is [`Category::Generic`].
pub fn classify(declared_type: &str, file_name: &str) -> Category {
    let essence = media_type_essence(declared_type);

    if essence.starts_with("image/") {
        return Category::Image;
    }
    if essence.starts_with("video/") || essence.starts_with("audio/") {
        return Category::AudioVideo;
    }
    if TEXT_TYPES.contains(&essence.as_str()) {
        return Category::Text;
    }
    if DOCUMENT_TYPES.contains(&essence.as_str())
        || OFFICE_EXTENSIONS.contains(&extension_of(file_name).as_str())
    {
        return Category::OfficeOrArchiveOrPdf;
    }

    Category::Generic
}

/// Lowercase media type without parameters (`Text/HTML; charset=utf-8` -> `text/html`)
pub fn media_type_essence(declared_type: &str) -> String {
    declared_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Lowercase extension of a file name without the leading dot
///
/// Returns an empty string when the name has no extension.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Best-effort media type for a file extension
///
/// Used when a caller has a file on disk but no declared type.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",

        // Video
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",

        // Text
        "txt" => "text/plain",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "md" | "markdown" => "text/markdown",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "exe" => "application/x-msdownload",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",

        _ => return None,
    };
    Some(mime)
}

/// Container extension for an audio/video media type
///
/// Used when the upload's file name carries no extension and the transcoder
/// still needs one to pick an output muxer.
pub fn extension_for_mime(declared_type: &str) -> Option<&'static str> {
    let ext = match media_type_essence(declared_type).as_str() {
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        "video/x-matroska" => "mkv",
        "video/x-msvideo" => "avi",
        "video/mpeg" => "mpg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/aac" => "aac",
        "audio/mp4" | "audio/x-m4a" => "m4a",
        "audio/webm" => "webm",
        _ => return None,
    };
    Some(ext)
}
