mod config;
mod room;
mod signaling;

pub use config::*;
pub use room::*;
pub use signaling::*;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(hub: RelayHub) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(hub)
}

/// Serves the relay on an already bound listener until the process stops.
pub async fn serve_on(listener: TcpListener, hub: RelayHub) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Relay listening on ws://{}/ws", addr);
    axum::serve(listener, router(hub))
        .await
        .context("Relay server stopped")?;
    Ok(())
}

pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    serve_on(listener, RelayHub::new()).await
}
