// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-sent event streams of live views.
//!
//! Each connection mounts its own view. The current state is sent at once,
//! then again after every change. The view is unmounted when the client
//! disconnects or when the stream ends on sign-out.

use crate::error::Result;
use crate::live::{CustomRoutinesView, ProgressView, RoutinesView};
use crate::middleware::auth::AuthUser;
use crate::routes::progress::ProgressResponse;
use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Router,
};
use futures_util::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/routines/events", get(routine_events))
        .route("/api/custom-routines/events", get(custom_routine_events))
        .route("/api/progress/events", get(progress_events))
}

/// Render `view` once immediately and once per tick of `changes`.
fn live_stream<V, F, T>(
    view: V,
    changes: watch::Receiver<u64>,
    name: &'static str,
    render: F,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>
where
    V: Send + 'static,
    F: Fn(&V) -> T + Send + 'static,
    T: Serialize,
{
    let events = stream::unfold(
        (view, changes, render, true),
        move |(view, mut changes, render, first)| async move {
            if first {
                changes.borrow_and_update();
            } else if changes.changed().await.is_err() {
                tracing::debug!(stream = name, "Live view closed, ending stream");
                return None;
            }

            let event = Event::default()
                .event(name)
                .json_data(render(&view))
                .unwrap_or_else(|e| {
                    tracing::warn!(stream = name, error = %e, "Failed to encode event");
                    Event::default().event("error").data("encoding failed")
                });

            Some((Ok(event), (view, changes, render, false)))
        },
    );

    Sse::new(events).keep_alive(KeepAlive::default())
}

async fn routine_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let view = RoutinesView::mount(&state.repos.routines, &user.identity, &state.live).await?;
    let changes = view.changes();
    Ok(live_stream(view, changes, "routines", RoutinesView::items))
}

async fn custom_routine_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let view =
        CustomRoutinesView::mount(&state.repos.custom_routines, &user.identity, &state.live)
            .await?;
    let changes = view.changes();
    Ok(live_stream(
        view,
        changes,
        "custom-routines",
        CustomRoutinesView::items,
    ))
}

async fn progress_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let view = ProgressView::mount(&state.repos, &user.identity, &state.live).await?;
    let changes = view.changes();
    let label_format = state.config.date_label_format.clone();
    Ok(live_stream(view, changes, "progress", move |view: &ProgressView| {
        ProgressResponse::from_view(view, &label_format)
    }))
}
