//! HTTP API tests driven through `tower::ServiceExt::oneshot`

use crate::common::{session_keys, token_for};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chatme::backend::notifications::InMemoryNotificationStore;
use chatme::backend::routes::create_router;
use chatme::backend::server::AppState;
use chatme::shared::{ListNotificationsResponse, UserId, UserRef};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> (Router, AppState) {
    let store = InMemoryNotificationStore::new();
    let state = AppState::new(Arc::new(store), session_keys());
    let router = create_router(state.clone(), &["http://localhost:5173".to_string()]);
    (router, state)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let (app, _) = app();
    let response = app.oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("running"));
}

#[tokio::test]
async fn notifications_require_a_token() {
    let (app, _) = app();

    let response = app.clone().oneshot(get("/api/notifications", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], 401);

    let response = app
        .oneshot(get("/api/notifications", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn notifications_list_only_the_callers_records() {
    let (app, state) = app();
    state
        .dispatcher
        .send_invite(&UserRef::new("alice", "Alice"), &UserRef::new("bob", "Bob"))
        .await;
    state
        .dispatcher
        .send_invite(&UserRef::new("carol", "Carol"), &UserRef::new("bob", "Bob"))
        .await;
    state
        .dispatcher
        .send_invite(&UserRef::new("bob", "Bob"), &UserRef::new("dave", "Dave"))
        .await;

    let response = app
        .oneshot(get("/api/notifications", Some(&token_for("bob"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ListNotificationsResponse =
        serde_json::from_value(json_body(response).await).unwrap();
    let senders: Vec<UserId> = body.notifications.iter().map(|n| n.sender_id.clone()).collect();
    assert_eq!(senders, vec![UserId::from("carol"), UserId::from("alice")]);
    assert!(body
        .notifications
        .iter()
        .all(|n| n.user_id == UserId::from("bob")));
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let (app, _) = app();
    let response = app.oneshot(get("/nope", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Not Found");
}
