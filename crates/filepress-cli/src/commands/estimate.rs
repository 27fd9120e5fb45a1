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


use crate::context::{declared_type, upload_name};
use crate::output;
use anyhow::{Context as _, Result};
use clap::Parser;
use filepress_compression::estimate;
use indicatif::HumanBytes;
use std::path::PathBuf;

/// Estimate output sizes for both modes
#[derive(Parser, Debug)]
pub struct EstimateCmd {
    /// File to estimate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Declared media type; inferred from the extension when omitted
    #[arg(short = 't', long = "type", value_name = "MIME")]
    pub media_type: Option<String>,

    /// Size in bytes, instead of reading it from FILE
    #[arg(long)]
    pub size: Option<u64>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl EstimateCmd {
    pub async fn execute(&self) -> Result<()> {
        let size = match self.size {
            Some(size) => size,
            None => {
                tokio::fs::metadata(&self.file)
                    .await
                    .with_context(|| format!("Failed to stat {}", self.file.display()))?
                    .len()
            }
        };

        let name = upload_name(&self.file);
        let result = estimate(
            &declared_type(&self.file, self.media_type.as_deref()),
            &name,
            size,
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        output::header(&name);
        output::detail("Class", result.class.as_str());
        output::detail("Original", &HumanBytes(result.original_size).to_string());
        output::detail("Quality", &format!("~{}", HumanBytes(result.quality)));
        output::detail("Max", &format!("~{}", HumanBytes(result.max)));
        Ok(())
    }
}
