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


//! FilePress HTTP server binary

use anyhow::{Context, Result};
use clap::Parser;
use filepress_config::{Config, ConfigLoader};
use filepress_observability::{init_tracing_with_config, LogConfig};
use filepress_server::{create_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;

/// Content-aware file compression service
#[derive(Parser, Debug)]
#[command(name = "filepress-server", version, about)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "FILEPRESS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::new()
        .load(args.config.as_deref())
        .await
        .context("failed to load configuration")?;
    apply_cli_overrides(&mut config, &args);

    let log_config = LogConfig::from_settings(
        &config.observability.log_level,
        &config.observability.log_format,
    )?
    .with_span_timings(true);
    init_tracing_with_config(log_config)?;

    let temp_dir = config.compression.resolved_temp_dir();
    tokio::fs::create_dir_all(&temp_dir)
        .await
        .with_context(|| format!("failed to create temp directory {}", temp_dir.display()))?;

    let state = Arc::new(AppState::from_config(&config));

    // A missing transcoder only affects audio/video uploads
    match state.orchestrator.transcoder().probe().await {
        Ok(info) => tracing::info!(binary = %info.binary, version = %info.version, "Transcoder available"),
        Err(e) => tracing::warn!(error = %e, "Transcoder unavailable; audio/video uploads will fail"),
    }

    let app = create_router(Arc::clone(&state));
    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        addr = %bind_addr,
        default_mode = %state.default_mode,
        max_upload_bytes = state.max_upload_bytes,
        temp_dir = %temp_dir.display(),
        "FilePress server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
