//! Sync sessions over HTTP against a live store server

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use diagram_collab::backend::server::{create_app_with_state, AppState};
use diagram_collab::client::{Config, EditorSurface, HttpBeacon, HttpStore, InMemoryEditor, InteractionEvent, SyncSession};
use diagram_collab::shared::AppConfig;

use crate::assert_ok;

async fn serve() -> (String, AppState) {
    let state = AppState::new();
    let app = create_app_with_state(state.clone());
    let listener = assert_ok!(tokio::net::TcpListener::bind("127.0.0.1:0").await);
    let addr = assert_ok!(listener.local_addr());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), state)
}

fn fast_config(url: &str) -> Config {
    assert_ok!(Config::with_builder(
        AppConfig::builder()
            .server_url(url)
            .presence_interval_ms(50)
            .document_interval_ms(100)
            .debounce_ms(30)
    ))
}

fn participant(config: &Config) -> (Arc<InMemoryEditor>, Arc<HttpBeacon>, SyncSession) {
    let store = Arc::new(assert_ok!(HttpStore::new(config.clone())));
    let beacon = Arc::new(HttpBeacon::new(config));
    let editor = Arc::new(InMemoryEditor::new());
    let session = SyncSession::new(config.sync_config(), store, editor.clone())
        .with_unload_transport(beacon.clone());
    (editor, beacon, session)
}

/// Poll `check` until it holds or five seconds pass
async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_participants_converge() {
    let (url, state) = serve().await;
    let config = fast_config(&url);
    let (alice_editor, _, mut alice) = participant(&config);
    let (bob_editor, _, mut bob) = participant(&config);

    assert_ok!(alice.start().await);
    assert_ok!(bob.start().await);
    assert_eq!(state.store.user_count().await, 2);

    let alice_view = &alice_editor;
    assert!(eventually(|| async move { alice_view.has_document() }).await);
    alice_editor.apply_local_edit("<shared/>");
    alice_editor.emit(InteractionEvent::Click);

    let bob_view = &bob_editor;
    assert!(eventually(|| async move { bob_view.snapshot().as_deref() == Some("<shared/>") }).await);
    let bob_presence = bob.presence();
    let bob_presence = &bob_presence;
    assert!(eventually(|| async move { *bob_presence.borrow() == Some(2) }).await);

    alice.stop().await;
    bob.stop().await;
    assert_eq!(state.store.user_count().await, 0);
    assert_eq!(state.store.diagram().await.as_deref(), Some("<shared/>"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unload_beacon_removes_participant() {
    let (url, state) = serve().await;
    let config = fast_config(&url);
    let (_, beacon, mut session) = participant(&config);

    assert_ok!(session.start().await);
    assert_eq!(state.store.user_count().await, 1);

    session.stop_abrupt().await;
    assert_ok!(tokio::task::spawn_blocking(move || beacon.flush()).await);
    assert_eq!(state.store.user_count().await, 0);
}
