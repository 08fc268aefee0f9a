// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Gateway Entry Point
//!
//! Starts the Axum HTTP server for the authentication gateway. All
//! configuration comes from the environment; an invalid configuration is
//! fatal before the listener binds.

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use auth_gateway::api;
use auth_gateway::config::{self, Config};
use auth_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env().map_err(|e| {
        error!("Configuration invalid, refusing to start: {e}");
        e
    })?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState::from_config(&config);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Authentication gateway listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Authentication gateway shut down");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls the filter (default `info`). `LOG_FORMAT=json`
/// switches to newline-delimited JSON for log shippers.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var(config::LOG_FORMAT_ENV).ok().as_deref() {
        Some("json") => builder.json().init(),
        _ => builder.init(),
    }
}

/// Wait for SIGINT or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("Received Ctrl+C, shutting down");
    }
}
