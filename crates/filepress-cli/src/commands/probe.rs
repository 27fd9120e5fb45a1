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


use crate::context::Context;
use crate::output;
use anyhow::{Context as _, Result};
use clap::Parser;
use filepress_compression::Transcoder;
use serde_json::json;
use std::path::PathBuf;

/// Check that the transcoder binary runs
#[derive(Parser, Debug)]
pub struct ProbeCmd {
    /// Transcoder binary [default: from config]
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProbeCmd {
    pub async fn execute(&self, ctx: &Context) -> Result<()> {
        let config = ctx.transcoder_config(self.ffmpeg.as_deref());
        let binary = config.binary.display().to_string();
        let transcoder = Transcoder::new(config);

        let info = transcoder
            .probe()
            .await
            .with_context(|| format!("Transcoder not available: {}", binary))?;

        if self.json {
            let out = json!({
                "binary": info.binary,
                "version": info.version,
                "max_concurrent": transcoder.config().max_concurrent.max(1),
                "timeout_secs": transcoder.config().timeout.as_secs(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        if !ctx.quiet {
            output::success("Transcoder available");
            output::detail("Binary", &info.binary);
            output::detail("Version", &info.version);
            output::detail(
                "Concurrent transcodes",
                &transcoder.available_permits().to_string(),
            );
        }
        Ok(())
    }
}
