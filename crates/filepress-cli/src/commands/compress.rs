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


use crate::context::{declared_type, upload_name, Context};
use crate::{output, progress};
use anyhow::{bail, Context as _, Result};
use clap::Parser;
use filepress_compression::{CompressionReport, Mode, UploadArtifact};
use indicatif::{HumanBytes, HumanDuration};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Compress a file with the strategy chosen for its type
///
/// The result keeps the original type and extension; text and generic files
/// become Brotli and Zstandard streams respectively.
#[derive(Parser, Debug)]
pub struct CompressCmd {
    /// File to compress
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Compression mode: quality or max (default from config)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Declared media type; inferred from the extension when omitted
    #[arg(short = 't', long = "type", value_name = "MIME")]
    pub media_type: Option<String>,

    /// Output path [default: <stem>.min.<ext> next to FILE]
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CompressOutput<'a> {
    output: String,
    content_type: &'a str,
    mode: Mode,
    report: &'a CompressionReport,
}

impl CompressCmd {
    pub async fn execute(&self, ctx: &Context) -> Result<()> {
        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.file));
        if output_path == self.file {
            bail!("Output path is the input file: {}", self.file.display());
        }
        if !self.force && output_path.exists() {
            bail!(
                "Output file already exists: {} (use --force to overwrite)",
                output_path.display()
            );
        }

        let data = tokio::fs::read(&self.file)
            .await
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let mode = self
            .mode
            .as_deref()
            .map(Mode::parse)
            .unwrap_or_else(|| ctx.default_mode());
        let name = upload_name(&self.file);
        let artifact = UploadArtifact::new(
            data,
            declared_type(&self.file, self.media_type.as_deref()),
            name.clone(),
            mode,
        );

        let orchestrator = ctx.orchestrator().await?;
        let spinner = progress::spinner(&format!("Compressing {}", name), ctx.quiet || self.json);
        let result = orchestrator.run(artifact).await;
        spinner.finish_and_clear();
        let compressed = result.with_context(|| format!("Failed to compress {}", name))?;

        tokio::fs::write(&output_path, &compressed.bytes)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        let report = &compressed.report;
        if self.json {
            let out = CompressOutput {
                output: output_path.display().to_string(),
                content_type: compressed.header_content_type(),
                mode,
                report,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        if ctx.quiet {
            return Ok(());
        }

        output::success(&format!("Compressed {}", name));
        output::detail("Category", report.category.as_str());
        output::detail("Strategy", report.strategy.as_str());
        output::detail("Settings", &report.settings.to_string());
        output::detail("Original", &HumanBytes(report.original_size as u64).to_string());
        output::detail(
            "Compressed",
            &HumanBytes(report.compressed_size as u64).to_string(),
        );
        output::detail("Saved", &format!("{:.1}%", report.space_saved_percent()));
        output::detail("Time", &HumanDuration(report.elapsed).to_string());
        output::detail("Output", &output_path.display().to_string());
        if !report.is_smaller() {
            output::warning("Output is not smaller than the input");
        }
        Ok(())
    }
}

/// `<stem>.min.<ext>` beside the input
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}.min.{}", stem, ext.to_string_lossy()),
        None => format!("{}.min", stem),
    };
    input.with_file_name(name)
}
