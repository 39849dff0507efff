// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight and completed-routine tracking routes.

use crate::error::{AppError, Result};
use crate::live::ProgressView;
use crate::middleware::auth::AuthUser;
use crate::models::stats::sort_chronologically;
use crate::models::{
    CompletedRoutineRecord, NewCompletedRoutine, NewWeightSample, ProgressCharts, WeightSample,
};
use crate::routes::routines::CreatedResponse;
use crate::time_utils::parse_input_date;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/progress", get(get_progress))
        .route("/api/progress/weights", post(add_weight))
        .route("/api/progress/completed", post(add_completed))
}

/// Progress screen: samples in date order plus chart series.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    pub weights: Vec<WeightSample>,
    pub completed: Vec<CompletedRoutineRecord>,
    pub charts: ProgressCharts,
}

impl ProgressResponse {
    pub fn build(
        weights: Vec<WeightSample>,
        completed: Vec<CompletedRoutineRecord>,
        label_format: &str,
    ) -> Self {
        let weights = sort_chronologically(weights);
        let completed = sort_chronologically(completed);
        let charts = ProgressCharts::build(weights.clone(), completed.clone(), label_format);
        Self {
            weights,
            completed,
            charts,
        }
    }

    /// Lists and charts come from a single read of the view.
    pub fn from_view(view: &ProgressView, label_format: &str) -> Self {
        let (weights, completed) = view.snapshot();
        Self::build(weights, completed, label_format)
    }
}

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let owner = &user.identity.email;
    let (weights, completed) = tokio::try_join!(
        state.repos.weights.list(owner),
        state.repos.completed.list(owner),
    )?;

    Ok(Json(ProgressResponse::build(
        weights,
        completed,
        &state.config.date_label_format,
    )))
}

#[derive(Deserialize)]
pub struct WeightRequest {
    /// Kilograms
    #[serde(default)]
    pub value: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
}

async fn add_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<WeightRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let value = request
        .value
        .ok_or_else(|| AppError::Validation("value is required".to_string()))?;
    let draft = NewWeightSample {
        value,
        date: parse_input_date("date", &request.date)?,
    };

    let id = state
        .repos
        .weights
        .create(&user.identity.email, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct CompletedRequest {
    #[serde(default)]
    pub name: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
}

async fn add_completed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CompletedRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let draft = NewCompletedRoutine {
        name: request.name.trim().to_string(),
        date: parse_input_date("date", &request.date)?,
    };

    let id = state
        .repos
        .completed
        .create(&user.identity.email, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}
