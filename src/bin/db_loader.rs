// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Load Generator Entry Point
//!
//! Starts the synthetic database load generator together with its
//! Prometheus scrape endpoint. The generator keeps retrying the database
//! forever, so the process stays up (and scrapeable) while Postgres is
//! down; both halves stop on SIGINT/SIGTERM.

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use auth_gateway::config::{self, LoaderConfig};
use auth_gateway::loader::metrics::LoaderMetrics;
use auth_gateway::loader::{self, LoadGenerator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = LoaderConfig::from_env().map_err(|e| {
        error!("Configuration invalid, refusing to start: {e}");
        e
    })?;

    let metrics = LoaderMetrics::new();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Load generator metrics listening");

    let shutdown = install_signal_handler();

    let worker = tokio::spawn(LoadGenerator::new(config, metrics.clone()).run(shutdown.clone()));

    let server_shutdown = shutdown.clone();
    axum::serve(listener, loader::metrics::router(metrics))
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await?;

    worker.await?;
    info!("Load generator shut down");
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

/// Install handlers for SIGINT and SIGTERM.
///
/// Returns a token that is cancelled when either signal arrives; the
/// handler task runs in the background until then.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

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

        handler_token.cancel();
    });

    token
}
