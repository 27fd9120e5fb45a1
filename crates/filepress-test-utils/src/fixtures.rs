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


//! Generated test fixtures.
//!
//! Images are rendered in memory so no binary files need to live in the
//! repository.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Test fixture helpers.
pub struct TestFixtures;

impl TestFixtures {
    /// Gradient RGBA image of the given size.
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) % 256) as u8,
                255,
            ])
        });
        DynamicImage::ImageRgba8(img)
    }

    /// Noisy RGB photo-like image; compresses poorly as PNG.
    pub fn noisy(width: u32, height: u32) -> DynamicImage {
        let mut state: u32 = 0x2545_f491;
        let img = RgbImage::from_fn(width, height, |_, _| {
            // xorshift
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Rgb([r, g, b])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Encode `img` in `format`.
    pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).expect("fixture image encodes");
        out.into_inner()
    }

    /// PNG gradient of the given size.
    pub fn png(width: u32, height: u32) -> Vec<u8> {
        Self::encode(&Self::gradient(width, height), ImageFormat::Png)
    }

    /// JPEG of a noisy image of the given size.
    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        Self::encode(&Self::noisy(width, height), ImageFormat::Jpeg)
    }

    /// Repetitive prose of roughly `target_size` bytes.
    pub fn text(target_size: usize) -> Vec<u8> {
        let pattern = b"FilePress squeezes uploads without changing what they are.\n";
        let repeats = (target_size / pattern.len()) + 1;
        pattern.repeat(repeats).into_iter().take(target_size).collect()
    }

    /// JSON document with `records` entries.
    pub fn json(records: usize) -> Vec<u8> {
        let body: Vec<String> = (0..records)
            .map(|i| format!(r#"{{"id":{},"name":"item-{}","tags":["alpha","beta"]}}"#, i, i))
            .collect();
        format!("[{}]", body.join(",")).into_bytes()
    }

    /// Binary content with a predictable but varied pattern.
    pub fn binary(size: usize) -> Vec<u8> {
        (0..size).map(|i| ((i * 31 + i / 7) % 256) as u8).collect()
    }

    /// Write `contents` to `dir/name` and return the path.
    pub fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("fixture file written");
        path
    }
}
