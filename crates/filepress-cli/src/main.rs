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


mod commands;
mod context;
mod output;
mod progress;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use commands::*;
use context::Context;
use filepress_config::ConfigLoader;
use filepress_observability::{init_tracing_with_config, LogConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filepress")]
#[command(version, about = "Content-aware file compression")]
#[command(
    long_about = "FilePress picks a compression strategy from a file's type: images are \
re-encoded, audio and video are transcoded with ffmpeg, text becomes a Brotli stream and \
everything else a Zstandard frame."
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "PATH", env = "FILEPRESS_CONFIG")]
    config: Option<PathBuf>,

    /// Colored output
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress(CompressCmd),

    /// Show the strategy and codec settings a file would get
    Classify(ClassifyCmd),

    /// Estimate output sizes for both modes
    Estimate(EstimateCmd),

    /// Check the transcoder binary
    Probe(ProbeCmd),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => console::set_colors_enabled(true),
        ColorChoice::Never => console::set_colors_enabled(false),
        ColorChoice::Auto => {}
    }

    if let Err(e) = run(cli).await {
        output::error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::new().load(cli.config.as_deref()).await?;

    let log_config = LogConfig::from_settings(
        &config.observability.log_level,
        &config.observability.log_format,
    )?
    .with_verbosity(cli.verbose, cli.quiet)
    .with_color(!matches!(cli.color, ColorChoice::Never));
    init_tracing_with_config(log_config)?;

    let ctx = Context::new(config, cli.quiet);
    match cli.command {
        Commands::Compress(cmd) => cmd.execute(&ctx).await,
        Commands::Classify(cmd) => cmd.execute(),
        Commands::Estimate(cmd) => cmd.execute().await,
        Commands::Probe(cmd) => cmd.execute(&ctx).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "filepress", &mut io::stdout());
            Ok(())
        }
    }
}
