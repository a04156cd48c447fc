use super::*;
use axum::{body, body::Body, http::Request};
use tower::ServiceExt;

async fn test_app(max_body_bytes: usize) -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = AppState {
        api: ApiContext {
            storage: storage.clone(),
        },
    };
    (build_router(Arc::new(state), max_body_bytes), storage)
}

fn contact_post(body: String) -> Request<Body> {
    Request::post("/contact")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app(4096).await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn contact_insert_persists_row_and_returns_created() {
    let (app, storage) = test_app(4096).await;
    let payload = serde_json::json!({
        "full_name": "Ana Ruiz",
        "email": "ana@correo.com",
        "phone_number": null,
        "subject": "Consulta",
        "message": "Hola",
    });

    let response = app
        .oneshot(contact_post(payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let created: InsertContactResponse = serde_json::from_slice(&body).expect("json");

    let stored = storage.list_contact_requests(10).await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, created.id);
    assert_eq!(stored[0].subject, "Consulta");
    assert!(stored[0].phone_number.is_none());
}

#[tokio::test]
async fn contact_insert_without_required_column_is_rejected() {
    let (app, storage) = test_app(4096).await;
    let payload = serde_json::json!({
        "full_name": "Ana Ruiz",
        "phone_number": null,
        "subject": "Consulta",
        "message": "Hola",
    });

    let response = app
        .oneshot(contact_post(payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let error: ApiError = serde_json::from_slice(&body).expect("json");
    assert_eq!(error.code, ErrorCode::Validation);
    assert_eq!(storage.count_contact_requests().await.expect("count"), 0);
}

#[tokio::test]
async fn oversized_contact_body_is_rejected() {
    let (app, storage) = test_app(256).await;
    let payload = serde_json::json!({
        "full_name": "Ana Ruiz",
        "email": "ana@correo.com",
        "phone_number": null,
        "subject": "Consulta",
        "message": "x".repeat(1024),
    });

    let response = app
        .oneshot(contact_post(payload.to_string()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(storage.count_contact_requests().await.expect("count"), 0);
}
