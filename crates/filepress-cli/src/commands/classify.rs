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
use anyhow::Result;
use clap::Parser;
use filepress_compression::{
    classify, Category, CodecSettings, Mode, StrategyKind, StrategyRegistry, UploadArtifact,
};
use serde::Serialize;
use std::path::PathBuf;

/// Show which strategy a file would get, without compressing it
#[derive(Parser, Debug)]
pub struct ClassifyCmd {
    /// File to classify (only the name is used)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Declared media type; inferred from the extension when omitted
    #[arg(short = 't', long = "type", value_name = "MIME")]
    pub media_type: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Classification {
    file_name: String,
    declared_type: String,
    category: Category,
    strategy: StrategyKind,
    quality: CodecSettings,
    max: CodecSettings,
}

impl ClassifyCmd {
    pub fn execute(&self) -> Result<()> {
        let file_name = upload_name(&self.file);
        let declared_type = declared_type(&self.file, self.media_type.as_deref());
        let category = classify(&declared_type, &file_name);
        let strategy = StrategyRegistry::with_defaults().resolve(category);

        // Settings depend only on type, name and mode
        let settings_for = |mode| {
            strategy.settings(&UploadArtifact::new(
                Vec::new(),
                declared_type.as_str(),
                file_name.as_str(),
                mode,
            ))
        };
        let result = Classification {
            quality: settings_for(Mode::Quality),
            max: settings_for(Mode::Max),
            strategy: strategy.kind(),
            category,
            file_name,
            declared_type,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        output::header(&result.file_name);
        output::detail(
            "Declared type",
            if result.declared_type.is_empty() {
                "(none)"
            } else {
                &result.declared_type
            },
        );
        output::detail("Category", result.category.as_str());
        output::detail("Strategy", result.strategy.as_str());
        output::detail("Quality", &result.quality.to_string());
        output::detail("Max", &result.max.to_string());
        Ok(())
    }
}
