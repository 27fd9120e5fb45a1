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

//! Input and output artifacts of a single dispatch

use crate::report::CompressionReport;
use crate::Mode;
use bytes::Bytes;

/// Content type used in headers when the upload declared none
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A single uploaded file, immutable once constructed
#[derive(Debug, Clone)]
pub struct UploadArtifact {
    /// Raw file contents
    pub bytes: Bytes,
    /// Media type the client declared (may be empty)
    pub declared_type: String,
    /// Client-supplied file name (may be empty)
    pub file_name: String,
    /// Requested aggressiveness
    pub mode: Mode,
}

impl UploadArtifact {
    /// Create a new upload artifact
    pub fn new(
        bytes: impl Into<Bytes>,
        declared_type: impl Into<String>,
        file_name: impl Into<String>,
        mode: Mode,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            declared_type: declared_type.into(),
            file_name: file_name.into(),
            mode,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the upload carries no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of a successful dispatch
///
/// `content_type` and `file_name` are always the values declared on the
/// upload, even when the payload was re-encoded into another format.
#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    /// Compressed payload
    pub bytes: Bytes,
    /// Declared type of the upload
    pub content_type: String,
    /// File name of the upload
    pub file_name: String,
    /// What was done and how well it worked
    pub report: CompressionReport,
}

impl CompressedArtifact {
    /// Value for a `Content-Type` header
    pub fn header_content_type(&self) -> &str {
        if self.content_type.trim().is_empty() {
            FALLBACK_CONTENT_TYPE
        } else {
            &self.content_type
        }
    }

    /// Value for a `Content-Disposition` header
    ///
    /// Quotes and backslashes are escaped and control characters dropped so
    /// the name cannot break out of the quoted-string.
    pub fn content_disposition(&self) -> String {
        let mut escaped = String::with_capacity(self.file_name.len());
        for c in self.file_name.chars() {
            match c {
                '"' | '\\' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                c if c.is_control() => {}
                c => escaped.push(c),
            }
        }
        format!("attachment; filename=\"{}\"", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::registry::{CodecSettings, StrategyKind};
    use std::time::Duration;

    fn artifact(content_type: &str, file_name: &str) -> CompressedArtifact {
        CompressedArtifact {
            bytes: Bytes::from_static(b"x"),
            content_type: content_type.to_string(),
            file_name: file_name.to_string(),
            report: CompressionReport::new(
                Category::Generic,
                StrategyKind::GenericBinary,
                CodecSettings::Zstd { level: 3 },
                10,
                1,
                Duration::ZERO,
            ),
        }
    }

    #[test]
    fn test_upload_len() {
        let upload = UploadArtifact::new(vec![1u8, 2, 3], "", "a.bin", Mode::Quality);
        assert_eq!(upload.len(), 3);
        assert!(!upload.is_empty());
        assert!(UploadArtifact::new(Vec::new(), "", "", Mode::Max).is_empty());
    }

    #[test]
    fn test_content_type_fallback() {
        assert_eq!(artifact("", "a").header_content_type(), FALLBACK_CONTENT_TYPE);
        assert_eq!(artifact("image/png", "a").header_content_type(), "image/png");
    }

    #[test]
    fn test_content_disposition_escaping() {
        assert_eq!(
            artifact("", "report.pdf").content_disposition(),
            "attachment; filename=\"report.pdf\""
        );
        assert_eq!(
            artifact("", "a\"b\\c\nd.txt").content_disposition(),
            "attachment; filename=\"a\\\"b\\\\cd.txt\""
        );
    }
}
