// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness tracker: profiles, workout routines and progress charts
//!
//! This crate provides the backend API for the fitness web app. Documents
//! live in Firestore; screens stay current through live queries that are
//! streamed to the browser as server-sent events.

pub mod config;
pub mod db;
pub mod error;
pub mod live;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::DocumentStore;
use live::LiveRegistry;
use repository::Repositories;
use services::{AuthProvider, PushRegistry};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub repos: Repositories,
    pub auth: Arc<dyn AuthProvider>,
    pub push: PushRegistry,
    pub live: LiveRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            config,
            repos: Repositories::new(Arc::clone(&store)),
            auth,
            push: PushRegistry::new(store),
            live: LiveRegistry::new(),
        }
    }
}
