//! Sync session scenarios under paused time

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tokio::time::Instant;

use diagram_collab::client::{
    EditorSurface, InteractionEvent, MemoryStore, StoreCalls, SyncConfig, SyncError, Teardown,
};
use diagram_collab::shared::ConfigError;

use crate::assert_ok;
use crate::common::{settle, Participant, DEBOUNCE, DOCUMENT_INTERVAL, PRESENCE_INTERVAL};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_presence_converges_across_sessions() {
    let store = Arc::new(MemoryStore::new());
    let mut participants: Vec<_> = (0..3).map(|_| Participant::new(&store)).collect();

    for participant in &mut participants {
        assert_ok!(participant.session.start().await);
    }
    tokio::time::sleep(PRESENCE_INTERVAL + Duration::from_millis(100)).await;

    for participant in &participants {
        assert_eq!(*participant.session.presence().borrow(), Some(3));
    }

    for participant in &mut participants {
        participant.session.stop().await;
    }
    assert_eq!(store.user_count(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_burst_of_activity_pushes_once() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    settle().await;

    alice.editor.apply_local_edit("<burst/>");
    let begin = Instant::now();
    for _ in 0..5 {
        alice.editor.emit(InteractionEvent::Hover);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let last_event = begin + Duration::from_millis(400);
    tokio::time::sleep(Duration::from_secs(1)).await;

    let writes = store.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, last_event + DEBOUNCE);
    assert_eq!(writes[0].1, "<burst/>");

    alice.session.stop().await;
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_edit_reaches_other_participant() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    let mut bob = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    assert_ok!(bob.session.start().await);
    settle().await;

    alice.edit("<from-alice/>");
    tokio::time::sleep(DOCUMENT_INTERVAL + Duration::from_millis(100)).await;

    assert_eq!(store.diagram().as_deref(), Some("<from-alice/>"));
    assert_eq!(bob.editor.snapshot().as_deref(), Some("<from-alice/>"));
    // alice's own push is not reloaded into her editor
    assert_eq!(alice.editor.snapshot().as_deref(), Some("<from-alice/>"));
    assert_eq!(alice.session.status().metrics.reconcile_skips, 1);

    alice.session.stop().await;
    bob.session.stop().await;
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_no_activity_after_stop() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    settle().await;

    // arms the debouncer; the push would be due 500ms from now
    alice.edit("<pending/>");
    alice.session.stop().await;

    let after_stop: StoreCalls = store.calls();
    let presence = *alice.session.presence().borrow();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(store.calls(), after_stop);
    assert!(store.writes().is_empty());
    assert_eq!(*alice.session.presence().borrow(), presence);
    assert_eq!(alice.editor.subscriber_count(), 0);
    assert!(!alice.editor.has_document());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_graceful_stop_only_removes() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    settle().await;

    alice.session.stop().await;
    alice.session.unload_signal().fire();
    settle().await;

    let calls = store.calls();
    assert_eq!(calls.remove_session, 1);
    assert_eq!(calls.beacon, 0);
    assert_eq!(calls.signal_abrupt, 0);
    assert_eq!(alice.session.status().teardown, Some(Teardown::Graceful));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_unload_only_signals_abrupt() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    settle().await;

    alice.session.unload_signal().fire();
    alice.session.stop().await;

    let calls = store.calls();
    assert_eq!(calls.beacon, 1);
    assert_eq!(calls.remove_session, 0);
    assert_eq!(store.user_count(), 0);
    assert_eq!(alice.session.status().teardown, Some(Teardown::Abrupt));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_unload_without_beacon_is_best_effort() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::without_beacon(store.clone());
    assert_ok!(alice.session.start().await);
    settle().await;

    alice.session.unload_signal().fire();
    settle().await;

    let calls = store.calls();
    assert_eq!(calls.signal_abrupt, 1);
    assert_eq!(calls.beacon, 0);
    assert_eq!(calls.remove_session, 0);

    alice.session.stop().await;
    assert_eq!(store.calls().remove_session, 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_failed_join_gates_everything() {
    let store = Arc::new(MemoryStore::with_diagram("<existing/>"));
    store.reject_joins(true);
    let mut alice = Participant::new(&store);

    assert_matches!(alice.session.start().await, Err(SyncError::Join(_)));
    alice.editor.emit(InteractionEvent::Click);
    tokio::time::sleep(DOCUMENT_INTERVAL * 5).await;

    let calls = store.calls();
    assert_eq!(calls.add_session, 1);
    assert_eq!(calls.traffic(), 0);
    assert_eq!(alice.editor.subscriber_count(), 0);
    assert!(!alice.editor.has_document());
    assert_eq!(*alice.session.presence().borrow(), None);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_invalid_timings_never_reach_the_store() {
    let store = Arc::new(MemoryStore::with_diagram("<existing/>"));
    let config = SyncConfig {
        document_interval: DEBOUNCE,
        ..SyncConfig::default()
    };
    let mut alice = Participant::with_config(&store, config);

    assert_matches!(
        alice.session.start().await,
        Err(SyncError::Config(ConfigError::PollFinerThanDebounce { .. }))
    );
    alice.edit("<local/>");
    tokio::time::sleep(DOCUMENT_INTERVAL * 3).await;

    assert_eq!(store.calls(), StoreCalls::default());
    assert!(!alice.session.status().running);
    assert_eq!(*alice.session.presence().borrow(), None);

    // the session is still inert, not stopped
    alice.session.stop().await;
    assert_eq!(store.calls(), StoreCalls::default());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_outage_does_not_stop_polling() {
    let store = Arc::new(MemoryStore::new());
    let mut alice = Participant::new(&store);
    assert_ok!(alice.session.start().await);
    settle().await;

    store.set_unavailable(true);
    tokio::time::sleep(PRESENCE_INTERVAL * 3).await;
    store.set_unavailable(false);
    store.put_diagram("<after-outage/>");
    tokio::time::sleep(DOCUMENT_INTERVAL).await;

    let metrics = alice.session.status().metrics;
    assert!(metrics.presence_failures >= 3);
    assert_eq!(alice.editor.snapshot().as_deref(), Some("<after-outage/>"));

    alice.session.stop().await;
}
