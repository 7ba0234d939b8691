/**
 * Diagram Sync Participant Entry Point
 *
 * Headless participant: joins the diagram store, keeps an in-memory editor in
 * step with the shared diagram and logs presence changes.
 *
 * Ctrl-C stops gracefully (leave over an ordinary request). SIGTERM is treated
 * as a host unload: the abrupt signal goes out over the beacon, which is
 * flushed before the process exits.
 */
use std::sync::Arc;

use diagram_collab::client::{
    Config, EditorSurface, HttpBeacon, HttpStore, InMemoryEditor, SyncSession,
};

#[cfg(unix)]
async fn terminated() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("[STARTUP] Cannot listen for SIGTERM: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminated() {
    std::future::pending::<()>().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::from_env()?;
    tracing::info!("[STARTUP] Connecting to {}", config.server_url());

    let store = Arc::new(HttpStore::new(config.clone())?);
    let beacon = Arc::new(HttpBeacon::new(&config));
    let editor = Arc::new(InMemoryEditor::new());

    let mut session = SyncSession::new(config.sync_config(), store, editor.clone())
        .with_unload_transport(beacon.clone());
    session.start().await?;

    let mut presence = session.presence();
    let mut last_len = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("[SHUTDOWN] Interrupted, leaving");
                session.stop().await;
                break;
            }
            _ = terminated() => {
                tracing::info!("[SHUTDOWN] Terminated, unloading");
                session.stop_abrupt().await;
                tokio::task::spawn_blocking(move || beacon.flush()).await?;
                break;
            }
            changed = presence.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(count) = *presence.borrow_and_update() {
                    tracing::info!("[Presence] {} participant(s) editing", count);
                }
                let len = editor.serialize_to_text().ok().map(|text| text.len());
                if len != last_len {
                    tracing::info!("[Document] {} bytes", len.unwrap_or(0));
                    last_len = len;
                }
            }
        }
    }

    Ok(())
}
