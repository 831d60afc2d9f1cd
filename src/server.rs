//! Serving loop with document store teardown.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;

use crate::persistence::StoreGateway;

/// Serves `app` on `listener` until `shutdown` resolves and in-flight
/// requests drain, then closes `store`.
///
/// The store is closed whether serving ends cleanly or with an error.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn run<F>(
    listener: TcpListener,
    app: Router,
    store: &StoreGateway,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    store.close().await;
    match &served {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(e) => tracing::error!(error = %e, "server stopped with an error"),
    }
    served
}
