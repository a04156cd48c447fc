use std::sync::Arc;

use super::*;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<serde_json::Value>>>>,
    status: StatusCode,
}

async fn capture(
    State(state): State<ServerState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(body);
    }
    if state.status.is_success() {
        (state.status, Json(serde_json::json!({ "id": 1 })))
    } else {
        (
            state.status,
            Json(serde_json::json!({ "code": "internal", "message": "database is locked" })),
        )
    }
}

async fn spawn_server(status: StatusCode) -> (String, oneshot::Receiver<serde_json::Value>) {
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
    };
    let app = Router::new()
        .route("/contact", post(capture))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn request() -> NewContactRequest {
    NewContactRequest {
        full_name: "Ana Ruiz".into(),
        email: "ana@correo.com".into(),
        phone_number: None,
        subject: "Consulta".into(),
        message: "Hola".into(),
    }
}

#[test]
fn endpoint_keeps_base_path() {
    let store = RestContactStore::new("https://example.com/api").expect("store");
    assert_eq!(store.endpoint().as_str(), "https://example.com/api/contact");

    let store = RestContactStore::new("http://127.0.0.1:8080").expect("store");
    assert_eq!(store.endpoint().as_str(), "http://127.0.0.1:8080/contact");
}

#[test]
fn rejects_non_http_server_urls() {
    assert!(RestContactStore::new("ftp://example.com").is_err());
    assert!(RestContactStore::new("not a url").is_err());
}

#[tokio::test]
async fn posts_wire_schema_to_contact_endpoint() {
    let (server_url, rx) = spawn_server(StatusCode::CREATED).await;
    let store = RestContactStore::new(&server_url).expect("store");

    store
        .insert_contact_request(&request())
        .await
        .expect("insert");

    let body = rx.await.expect("captured body");
    assert_eq!(
        body,
        serde_json::json!({
            "full_name": "Ana Ruiz",
            "email": "ana@correo.com",
            "phone_number": null,
            "subject": "Consulta",
            "message": "Hola",
        })
    );
}

#[tokio::test]
async fn server_error_becomes_rejected_with_api_message() {
    let (server_url, _rx) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let store = RestContactStore::new(&server_url).expect("store");

    let err = store
        .insert_contact_request(&request())
        .await
        .expect_err("server error");
    match err {
        InsertError::Rejected { status, source } => {
            assert_eq!(status, 500);
            assert_eq!(source.message, "database is locked");
        }
        other => panic!("expected rejected insert, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let store = RestContactStore::new(&format!("http://{addr}")).expect("store");
    let err = store
        .insert_contact_request(&request())
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, InsertError::Transport(_)), "got {err:?}");
}
