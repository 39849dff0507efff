// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Every rejected payload must fail with 400 before anything is written.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn assert_rejected(uri: &str, method: &str, body: serde_json::Value) {
    let (app, state, store) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request(method, uri, &token, Some(body.clone())))
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::BAD_REQUEST,
        "{method} {uri} with {body}"
    );
    let error = common::json_body(response).await;
    assert_eq!(error["error"], "validation_error");
    assert_eq!(store.writes(), 0, "{method} {uri} wrote despite invalid input");
}

#[tokio::test]
async fn test_profile_with_empty_name_rejected() {
    assert_rejected(
        "/api/profile",
        "PUT",
        json!({"name": "", "age": 30, "height": 170}),
    )
    .await;
}

#[tokio::test]
async fn test_profile_with_missing_fields_rejected() {
    assert_rejected("/api/profile", "PUT", json!({"name": "Ana"})).await;
}

#[tokio::test]
async fn test_routine_with_blank_name_rejected() {
    assert_rejected("/api/routines", "POST", json!({"name": "   ", "time": ""})).await;
}

#[tokio::test]
async fn test_routine_with_malformed_time_rejected() {
    assert_rejected(
        "/api/routines",
        "POST",
        json!({"name": "Cardio", "time": "tomorrow morning"}),
    )
    .await;
}

#[tokio::test]
async fn test_weight_without_value_or_date_rejected() {
    assert_rejected("/api/progress/weights", "POST", json!({"date": "2024-01-05"})).await;
    assert_rejected("/api/progress/weights", "POST", json!({"value": 80.0})).await;
    assert_rejected(
        "/api/progress/weights",
        "POST",
        json!({"value": 80.0, "date": "05/01/2024"}),
    )
    .await;
    assert_rejected(
        "/api/progress/weights",
        "POST",
        json!({"value": 0.0, "date": "2024-01-05"}),
    )
    .await;
}

#[tokio::test]
async fn test_completed_routine_without_name_rejected() {
    assert_rejected(
        "/api/progress/completed",
        "POST",
        json!({"name": "", "date": "2024-02-10"}),
    )
    .await;
}

#[tokio::test]
async fn test_custom_routine_without_exercises_rejected() {
    assert_rejected(
        "/api/custom-routines",
        "POST",
        json!({"name": "Pierna", "description": "Día de pierna", "exercises": []}),
    )
    .await;
}

#[tokio::test]
async fn test_custom_routine_with_incomplete_exercise_rejected() {
    let body = json!({
        "name": "Pierna",
        "description": "Día de pierna",
        "exercises": [{"name": "Sentadilla", "sets": 4, "reps": 10, "area": "Piernas"}]
    });
    assert_rejected("/api/custom-routines", "POST", body.clone()).await;
    assert_rejected("/api/custom-routines/abc", "PUT", body).await;
}

#[tokio::test]
async fn test_push_token_blank_rejected() {
    assert_rejected("/api/push/token", "POST", json!({"token": ""})).await;
}
