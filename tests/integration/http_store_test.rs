//! HTTP store and unload beacon against a wiremock server

use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use diagram_collab::client::{
    Config, HttpBeacon, HttpStore, RemoteStore, StoreError, UnloadTransport,
};
use diagram_collab::shared::{AbruptSignal, AppConfig};

use crate::assert_ok;

fn config_for(server: &MockServer) -> Config {
    assert_ok!(Config::with_builder(AppConfig::builder().server_url(server.uri())))
}

fn store_for(server: &MockServer) -> HttpStore {
    assert_ok!(HttpStore::new(config_for(server)))
}

#[tokio::test]
async fn test_session_count_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_count": 4 })))
        .mount(&server)
        .await;

    let count = assert_ok!(store_for(&server).session_count().await);
    assert_eq!(count, 4);
}

#[tokio::test]
async fn test_read_document_null_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-diagram"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "diagram": null })))
        .mount(&server)
        .await;

    assert_eq!(assert_ok!(store_for(&server).read_document().await), None);
}

#[tokio::test]
async fn test_write_document_sends_new_diagram() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save-diagram"))
        .and(body_json(json!({ "new_diagram": "<bpmn/>" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Diagram saved" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(store_for(&server).write_document("<bpmn/>").await);
}

#[tokio::test]
async fn test_join_and_leave_post_to_user_endpoints() {
    let server = MockServer::start().await;
    let ack = json!({ "status": "ok", "user_count": 1 });
    Mock::given(method("POST"))
        .and(path("/add-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/remove-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ack))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.add_session().await);
    assert_ok!(store.remove_session().await);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add-user"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = store_for(&server).add_session().await.unwrap_err();
    assert_matches!(err, StoreError::Status { status: 503, ref body } if body == "maintenance");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user-count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = store_for(&server).session_count().await.unwrap_err();
    assert_matches!(err, StoreError::Decode(_));
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    // nothing listens on a port that was just released
    let listener = assert_ok!(std::net::TcpListener::bind("127.0.0.1:0"));
    let port = assert_ok!(listener.local_addr()).port();
    drop(listener);

    let config = assert_ok!(Config::with_builder(
        AppConfig::builder().server_url(format!("http://127.0.0.1:{}", port))
    ));
    let store = assert_ok!(HttpStore::new(config));
    assert_matches!(store.read_document().await, Err(StoreError::Transport(_)));
}

#[tokio::test]
async fn test_signal_abrupt_sends_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user-beacon"))
        .and(header("content-type", "text/plain;charset=UTF-8"))
        .and(body_string(r#"{"action":"remove_user"}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(store_for(&server).signal_abrupt(AbruptSignal::remove_user()).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_beacon_delivers_outside_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user-beacon"))
        .and(body_string(r#"{"action":"remove_user"}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let beacon = Arc::new(HttpBeacon::new(&config_for(&server)));
    assert!(beacon.url().ends_with("/user-beacon"));
    assert!(beacon.send(AbruptSignal::remove_user()));

    let flushing = beacon.clone();
    assert_ok!(tokio::task::spawn_blocking(move || flushing.flush()).await);
    server.verify().await;
}
