// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::Context;
use news_search::app::{create_router, AppState, VERSION};
use news_search::services::logging;
use news_search::services::search::{SearchClient, SearchConfig};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = SearchConfig::from_env()?;

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

    let client = SearchClient::new(&config)?;

    // The engine may come up after us; requests fail with 502 until it does
    match client.ping().await {
        Ok(()) => tracing::info!("Connected to Elasticsearch at {}", config.url),
        Err(e) => tracing::warn!("Elasticsearch at {} is not reachable yet: {}", config.url, e),
    }

    tracing::info!(
        index = %config.index,
        timeout_ms = config.timeout.as_millis() as u64,
        max_page_size = config.max_page_size,
        "Search configuration loaded"
    );

    let state = AppState::new(Arc::new(client), config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("news-search v{} listening on {}", VERSION, bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
