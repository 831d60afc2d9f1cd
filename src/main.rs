//! placeholder-mirror server entry point.
//!
//! Connects the document store, then serves the REST endpoints until
//! Ctrl-C, closing the store after in-flight requests drain.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use placeholder_mirror::api;
use placeholder_mirror::app_state::AppState;
use placeholder_mirror::config::MirrorConfig;
use placeholder_mirror::persistence::StoreGateway;
use placeholder_mirror::server;
use placeholder_mirror::service::MirrorService;
use placeholder_mirror::upstream::HttpUpstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = MirrorConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.store.backend,
        upstream = %config.upstream_base_url,
        "starting placeholder-mirror"
    );

    // Fallible setup runs before the store connects
    let upstream = HttpUpstream::new(&config.upstream_base_url, config.upstream_timeout)?;
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    // Connect the store; the process cannot serve without it
    let store = Arc::new(StoreGateway::new(config.store.clone()));
    if let Err(e) = store.connect().await {
        tracing::error!(error = %e, "failed to connect to document store");
        return Err(e).context("document store unreachable");
    }

    // Build service layer
    let mirror_service = Arc::new(MirrorService::new(
        Arc::clone(&store),
        Arc::new(upstream),
        config.sync_user_limit,
    ));

    // Build router
    let app = api::build_app(AppState { mirror_service }, config.request_timeout);

    // Start server
    tracing::info!(addr = %config.listen_addr, "server listening");
    server::run(listener, app, &store, shutdown_signal())
        .await
        .context("server error")
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; shutting down");
        return;
    }
    tracing::info!("received ctrl-c, shutting down");
}
