// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password session routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_jwt, session_token, verify_jwt, SESSION_COOKIE, SESSION_DAYS,
};
use crate::models::{Credentials, Identity};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Session issued after sign-in or sign-up.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    /// Same JWT as the session cookie, for Bearer use
    pub token: String,
}

/// Session cookie with the attributes shared by creation and removal.
fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    identity: Identity,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&identity, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let mut cookie = session_cookie(token.clone(), state.config.secure_cookies());
    cookie.set_max_age(time::Duration::days(SESSION_DAYS));

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            uid: identity.uid,
            email: identity.email,
            token,
        }),
    ))
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let identity = state.auth.sign_up(&credentials).await?;
    tracing::info!(uid = %identity.uid, "Account registered");

    let (jar, body) = start_session(&state, jar, identity)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// Sign in and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let identity = state.auth.sign_in(&credentials).await?;
    tracing::info!(uid = %identity.uid, "Signed in");

    start_session(&state, jar, identity)
}

/// End the session: close every live view of the identity and clear the cookie.
///
/// Always succeeds; a missing or expired session only clears the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (StatusCode, CookieJar) {
    let identity = session_token(&jar, &headers)
        .and_then(|token| verify_jwt(&token, &state.config.jwt_signing_key).ok());

    if let Some(identity) = identity {
        let cancelled = state.live.cancel_all(&identity);
        if let Err(e) = state.auth.sign_out(&identity).await {
            tracing::warn!(uid = %identity.uid, error = %e, "Auth provider sign-out failed");
        }
        tracing::info!(uid = %identity.uid, cancelled, "Signed out");
    }

    let removal = session_cookie(String::new(), state.config.secure_cookies());
    (StatusCode::NO_CONTENT, jar.remove(removal))
}
