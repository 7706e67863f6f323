use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use blog_api::{auth::TokenService, db, rest, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-key-32-bytes!";

pub async fn create_test_app() -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    db::migrate(&pool).await.unwrap();

    let tokens = TokenService::new(TEST_SECRET, Duration::from_secs(3600));
    rest::router(AppState::new(pool, tokens))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Registers a user and logs in, returning `(user_id, token)`.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    let user_id = body["user"]["id"].as_i64().unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (user_id, token)
}
