// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push notification token registration.
//!
//! The browser obtains the delivery token; the server only records which
//! account it belongs to so a sender can look it up later.

use std::sync::Arc;

use chrono::Utc;

use crate::db::{collections, encode, DocumentStore};
use crate::error::AppError;
use crate::models::{Identity, PushToken};
use crate::time_utils::format_utc_rfc3339;

/// Longest token accepted (FCM tokens are well under this).
const MAX_TOKEN_LEN: usize = 4096;

#[derive(Clone)]
pub struct PushRegistry {
    store: Arc<dyn DocumentStore>,
}

impl PushRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record `token` for `identity`, replacing any earlier owner of the same token.
    pub async fn register(&self, identity: &Identity, token: &str) -> Result<PushToken, AppError> {
        let token = token.trim();
        if token.is_empty() || token.len() > MAX_TOKEN_LEN || token.contains('/') {
            return Err(AppError::Validation("Invalid push token.".to_string()));
        }

        let record = PushToken {
            token: token.to_string(),
            owner: identity.email.clone(),
            updated_at: format_utc_rfc3339(Utc::now()),
        };
        self.store
            .set(collections::PUSH_TOKENS, token, encode(&record)?)
            .await?;

        tracing::info!(uid = %identity.uid, "Push token registered");
        Ok(record)
    }
}
