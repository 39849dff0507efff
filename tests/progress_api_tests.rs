// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress and dashboard endpoint tests.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_weights_are_returned_in_date_order_with_labels() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);

    for (value, date) in [(80.0, "2024-01-05"), (78.0, "2024-01-01")] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "POST",
                "/api/progress/weights",
                &token,
                Some(json!({"value": value, "date": date})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(common::json_body(response).await["id"].is_string());
    }

    let response = app
        .oneshot(common::authed_request("GET", "/api/progress", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    let dates: Vec<&str> = body["weights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-05"]);
    assert_eq!(body["charts"]["weight"]["labels"], json!(["01/01/2024", "05/01/2024"]));
    assert_eq!(body["charts"]["weight"]["values"], json!([78.0, 80.0]));
}

#[tokio::test]
async fn test_completed_routines_counted_per_day() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);

    for (name, date) in [
        ("Cardio", "2024-02-10"),
        ("Fuerza", "2024-02-10"),
        ("Yoga", "2024-02-08"),
    ] {
        let response = app
            .clone()
            .oneshot(common::authed_request(
                "POST",
                "/api/progress/completed",
                &token,
                Some(json!({"name": name, "date": date})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(common::authed_request("GET", "/api/progress", &token, None))
        .await
        .unwrap();
    let body = common::json_body(response).await;

    let by_day = &body["charts"]["completed_by_day"];
    assert_eq!(by_day["labels"], json!(["08/02/2024", "10/02/2024"]));
    assert_eq!(by_day["counts"], json!([1, 2]));
    assert_eq!(body["completed"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_progress_is_empty_for_new_user() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);

    let response = app
        .oneshot(common::authed_request("GET", "/api/progress", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["weights"], json!([]));
    assert_eq!(body["completed"], json!([]));
    assert_eq!(body["charts"]["weight"]["labels"], json!([]));
    assert_eq!(body["charts"]["completed_by_day"]["counts"], json!([]));
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let (app, state, store) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);
    store.set_offline(true);

    let response = app
        .oneshot(common::authed_request(
            "POST",
            "/api/progress/weights",
            &token,
            Some(json!({"value": 80.0, "date": "2024-01-05"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(common::json_body(response).await["error"], "database_error");
}

#[tokio::test]
async fn test_dashboard_summarizes_user_data() {
    let (app, state, _) = common::create_test_app();
    let token = common::create_test_jwt(&common::test_identity("ana"), &state.config.jwt_signing_key);

    let requests = [
        ("PUT", "/api/profile", json!({"name": "Ana", "age": 30, "height": 165})),
        ("POST", "/api/routines", json!({"name": "Cardio", "time": "2024-01-05T07:30"})),
        ("POST", "/api/progress/weights", json!({"value": 80.0, "date": "2024-01-05"})),
        ("POST", "/api/progress/weights", json!({"value": 78.0, "date": "2024-03-01"})),
        ("POST", "/api/progress/weights", json!({"value": 79.0, "date": "2024-02-01"})),
    ];
    for (method, uri, body) in requests {
        let response = app
            .clone()
            .oneshot(common::authed_request(method, uri, &token, Some(body)))
            .await
            .unwrap();
        assert!(response.status().is_success(), "{method} {uri}");
    }

    let response = app
        .oneshot(common::authed_request("GET", "/api/dashboard", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::json_body(response).await;
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["profile"]["name"], "Ana");
    assert_eq!(body["routines"], 1);
    assert_eq!(body["custom_routines"], 0);
    assert_eq!(body["completed_routines"], 0);
    assert_eq!(body["latest_weight"]["value"], 78.0);
}
