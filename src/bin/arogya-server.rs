// ABOUTME: Server binary wiring configuration, logging, database, and HTTP routes
// ABOUTME: Starts the plan generation API with graceful shutdown on Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! # Arogya Server Binary
//!
//! Starts the health plan generation API: loads configuration from the
//! environment, opens the database, resolves the generation provider,
//! and serves the HTTP routes.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use arogya::{config::ServerConfig, context::ServerResources, logging, routes};

#[derive(Parser)]
#[command(name = "arogya-server")]
#[command(about = "Arogya - AI health and fitness plan generation API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Arogya plan generation API");
    info!("{}", config.summary());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let resources = ServerResources::new(config)
        .await
        .context("Failed to initialize server resources")?;

    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
        return;
    }
    info!("Shutdown signal received");
}
