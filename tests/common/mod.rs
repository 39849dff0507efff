// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use fitness_tracker::config::Config;
use fitness_tracker::db::{FirestoreStore, MemoryStore};
use fitness_tracker::middleware::auth::create_jwt;
use fitness_tracker::models::Identity;
use fitness_tracker::routes::create_router;
use fitness_tracker::services::MemoryAuth;
use fitness_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_firestore() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Identity used by most tests.
#[allow(dead_code)]
pub fn test_identity(name: &str) -> Identity {
    Identity {
        uid: format!("uid-{name}"),
        email: format!("{name}@example.com"),
    }
}

/// Create a session token for `identity`.
#[allow(dead_code)]
pub fn create_test_jwt(identity: &Identity, signing_key: &[u8]) -> String {
    create_jwt(identity, signing_key).expect("Failed to create JWT")
}

/// Create a test app with in-memory store and accounts.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(
        config,
        Arc::new(store.clone()),
        Arc::new(MemoryAuth::new()),
    ));

    (create_router(state.clone()), state, store)
}

/// Build a request with a Bearer token and optional JSON body.
#[allow(dead_code)]
pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
