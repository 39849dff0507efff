// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routine and custom routine routes.
//!
//! Update and delete check ownership first: a document that exists but
//! belongs to someone else is reported as not found.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CustomRoutine, CustomRoutineDraft, NewRoutine, Routine};
use crate::repository::{EntityRepository, OwnedEntity, Ownership};
use crate::time_utils::parse_input_local_time;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/routines", get(list_routines).post(create_routine))
        .route("/api/routines/{id}", delete(delete_routine))
        .route(
            "/api/custom-routines",
            get(list_custom_routines).post(create_custom_routine),
        )
        .route(
            "/api/custom-routines/{id}",
            put(replace_custom_routine).delete(delete_custom_routine),
        )
}

/// ID of a newly created document.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatedResponse {
    pub id: String,
}

/// Reject access to a document owned by another user.
async fn ensure_not_foreign<E: OwnedEntity>(
    repo: &EntityRepository<E>,
    user: &AuthUser,
    id: &str,
) -> Result<()> {
    match repo.ownership(&user.identity.email, id).await? {
        Ownership::Foreign => {
            tracing::warn!(uid = %user.identity.uid, id, "Rejected access to foreign document");
            Err(AppError::NotFound(format!("Document {} not found", id)))
        }
        Ownership::Owned | Ownership::Absent => Ok(()),
    }
}

// ─── Routines ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RoutineRequest {
    #[serde(default)]
    pub name: String,
    /// `YYYY-MM-DDTHH:MM`, or empty for no time
    #[serde(default)]
    pub time: String,
}

async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Routine>>> {
    Ok(Json(state.repos.routines.list(&user.identity.email).await?))
}

async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RoutineRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let draft = NewRoutine {
        name: request.name.trim().to_string(),
        time: parse_input_local_time("time", &request.time)?,
    };

    let id = state
        .repos
        .routines
        .create(&user.identity.email, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ensure_not_foreign(&state.repos.routines, &user, &id).await?;
    state.repos.routines.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Custom Routines ─────────────────────────────────────────

async fn list_custom_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CustomRoutine>>> {
    Ok(Json(
        state
            .repos
            .custom_routines
            .list(&user.identity.email)
            .await?,
    ))
}

async fn create_custom_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<CustomRoutineDraft>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let id = state
        .repos
        .custom_routines
        .create(&user.identity.email, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Full replace; creates the document if the ID is unused.
async fn replace_custom_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(draft): Json<CustomRoutineDraft>,
) -> Result<StatusCode> {
    draft.validate()?;
    let repo = &state.repos.custom_routines;
    ensure_not_foreign(repo, &user, &id).await?;
    repo.update(&user.identity.email, &id, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_custom_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    ensure_not_foreign(&state.repos.custom_routines, &user, &id).await?;
    state.repos.custom_routines.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
