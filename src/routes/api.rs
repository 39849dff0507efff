// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: profile, dashboard, push registration.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::stats::sort_chronologically;
use crate::models::{Profile, WeightSample};
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

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/push/token", post(register_push_token))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user and saved profile.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    /// `null` until the first save
    pub profile: Option<Profile>,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state.repos.profiles.get(&user.identity.uid).await?;

    Ok(Json(ProfileResponse {
        uid: user.identity.uid,
        email: user.identity.email,
        profile,
    }))
}

/// Replace the profile. Every field is required.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(profile): Json<Profile>,
) -> Result<Json<ProfileResponse>> {
    state
        .repos
        .profiles
        .save(&user.identity.uid, &profile)
        .await?;

    Ok(Json(ProfileResponse {
        uid: user.identity.uid,
        email: user.identity.email,
        profile: Some(profile),
    }))
}

// ─── Dashboard ───────────────────────────────────────────────

/// Summary of everything the user has stored.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    pub email: String,
    pub profile: Option<Profile>,
    pub routines: usize,
    pub custom_routines: usize,
    pub completed_routines: usize,
    /// Most recent weight sample by date
    pub latest_weight: Option<WeightSample>,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let identity = &user.identity;
    let repos = &state.repos;

    let (profile, routines, custom_routines, weights, completed) = tokio::try_join!(
        repos.profiles.get(&identity.uid),
        repos.routines.list(&identity.email),
        repos.custom_routines.list(&identity.email),
        repos.weights.list(&identity.email),
        repos.completed.list(&identity.email),
    )?;

    Ok(Json(DashboardResponse {
        email: identity.email.clone(),
        profile,
        routines: routines.len(),
        custom_routines: custom_routines.len(),
        completed_routines: completed.len(),
        latest_weight: sort_chronologically(weights).pop(),
    }))
}

// ─── Push Notifications ──────────────────────────────────────

#[derive(Deserialize)]
pub struct PushTokenRequest {
    #[serde(default)]
    pub token: String,
}

async fn register_push_token(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<PushTokenRequest>,
) -> Result<StatusCode> {
    state.push.register(&user.identity, &request.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
