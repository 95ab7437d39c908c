//! Common test utilities for Flashdeck integration tests
//!
//! This file contains shared functions for all integration tests: test
//! application setup and helpers for registering users and creating
//! collections and cards through the API.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use flashdeck::{auth::AuthKeys, create_app, db::{init_pool, DbPool}, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::Service;

/// Creates a fresh in-memory database with migrations applied
///
/// Each call gets its own uniquely named shared-cache database so all
/// pooled connections see the same schema while tests stay isolated.
pub fn create_test_pool() -> Arc<DbPool> {
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = init_pool(&database_url).unwrap();

    let conn = &mut pool.get().unwrap();
    flashdeck::run_migrations(conn).unwrap();

    Arc::new(pool)
}

/// Creates a test application and returns it together with its pool
pub fn create_test_app_with_pool() -> (Router, Arc<DbPool>) {
    let pool = create_test_pool();
    let keys = AuthKeys::new("integration-secret", Duration::from_secs(3600));
    (create_app(AppState::new(pool.clone(), keys)), pool)
}

/// Creates a test application with an in-memory SQLite database
pub fn create_test_app() -> Router {
    create_test_app_with_pool().0
}

/// A parsed response
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

/// Sends a request to the app
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - HTTP method
/// * `uri` - Request path including `/api`
/// * `cookie` - Optional `auth_token=...` pair
/// * `body` - Optional JSON body
pub async fn send(app: &mut Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, set_cookie, body }
}

/// Registers a user via the API and returns its id
pub async fn register(app: &mut Router, username: &str, password: &str, role: Option<&str>) -> String {
    let response = send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": username, "password": password, "role": role })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

/// Logs in and returns the `auth_token=...` cookie pair
pub async fn login(app: &mut Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let set_cookie = response.set_cookie.expect("login should set a cookie");
    set_cookie.split(';').next().unwrap().trim().to_string()
}

/// Registers a plain user and logs in, returning the cookie pair
pub async fn register_and_login(app: &mut Router, username: &str) -> String {
    register(app, username, "password123", None).await;
    login(app, username, "password123").await
}

/// Creates a collection via the API and returns its id
pub async fn create_collection(app: &mut Router, cookie: &str, name: &str, is_public: bool) -> String {
    let response = send(
        app,
        "POST",
        "/api/collections",
        Some(cookie),
        Some(json!({ "name": name, "isPublic": is_public })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

/// Creates a card inside a collection via the API and returns the card id
pub async fn create_card(app: &mut Router, cookie: &str, collection_id: &str, question: &str, answer: &str, priority: Option<i32>) -> String {
    let response = send(
        app,
        "POST",
        &format!("/api/collections/{}/flashcards", collection_id),
        Some(cookie),
        Some(json!({ "question": question, "answer": answer, "priority": priority })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["card"]["id"].as_str().unwrap().to_string()
}
