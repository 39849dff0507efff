// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Documents are read as untyped maps; the `_firestore_*` meta fields the
//! client injects are stripped and the document ID is taken from
//! `_firestore_id`. Live queries use a Firestore listener per query and
//! re-read the full matching set on every change event.

use std::sync::Arc;

use async_trait::async_trait;
use firestore::{FirestoreListenEvent, FirestoreListenerTarget, FirestoreMemListenStateStorage};
use serde_json::Value;
use tokio::sync::watch;

use crate::db::{Document, DocumentStore, Fields, OwnerQuery, Snapshot, OWNER_FIELD};
use crate::error::AppError;

const META_PREFIX: &str = "_firestore_";
const META_ID: &str = "_firestore_id";
const LISTENER_TARGET: u32 = 1;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // Emulator connections are unauthenticated
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJvd25lciJ9."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

/// Split a raw Firestore map into ID and stored fields.
fn into_document(mut fields: Fields) -> Option<Document> {
    let id = match fields.remove(META_ID) {
        Some(Value::String(id)) => id,
        _ => return None,
    };
    fields.retain(|key, _| !key.starts_with(META_PREFIX));
    Some(Document::new(id, fields))
}

async fn run_query(
    client: &firestore::FirestoreDb,
    collection: &'static str,
    owner: String,
) -> Result<Snapshot, AppError> {
    let rows: Vec<Fields> = client
        .fluent()
        .select()
        .from(collection)
        .filter(move |q| q.for_all([q.field(OWNER_FIELD).eq(owner.clone())]))
        .obj()
        .query()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(rows.into_iter().filter_map(into_document).collect())
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let fields: Option<Fields> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(fields.and_then(into_document))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(&fields)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn query(&self, query: &OwnerQuery) -> Result<Snapshot, AppError> {
        run_query(self.get_client()?, query.collection, query.owner.clone()).await
    }

    async fn watch(&self, query: &OwnerQuery) -> Result<watch::Receiver<Snapshot>, AppError> {
        let client = self.get_client()?.clone();
        let collection = query.collection;
        let owner = query.owner.clone();

        let initial = run_query(&client, collection, owner.clone()).await?;
        let (tx, rx) = watch::channel(initial);
        let tx = Arc::new(tx);

        let mut listener = client
            .create_listener(FirestoreMemListenStateStorage::new())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create listener: {}", e)))?;

        let filter_owner = owner.clone();
        client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field(OWNER_FIELD).eq(filter_owner.clone())]))
            .listen()
            .add_target(FirestoreListenerTarget::new(LISTENER_TARGET), &mut listener)
            .map_err(|e| AppError::Database(format!("Failed to add listen target: {}", e)))?;

        let cb_tx = Arc::clone(&tx);
        let cb_client = client.clone();
        listener
            .start(move |event| {
                let tx = Arc::clone(&cb_tx);
                let client = cb_client.clone();
                let owner = owner.clone();
                async move {
                    match event {
                        FirestoreListenEvent::DocumentChange(_)
                        | FirestoreListenEvent::DocumentDelete(_)
                        | FirestoreListenEvent::DocumentRemove(_) => {}
                        _ => return Ok(()),
                    }

                    match run_query(&client, collection, owner).await {
                        Ok(snapshot) => {
                            tx.send_if_modified(|current| {
                                if *current == snapshot {
                                    return false;
                                }
                                *current = snapshot;
                                true
                            });
                        }
                        Err(e) => {
                            tracing::warn!(collection, error = %e, "Live query refresh failed");
                        }
                    }
                    Ok(())
                }
            })
            .await
            .map_err(|e| AppError::Database(format!("Failed to start listener: {}", e)))?;

        // Stop listening once every receiver is gone
        tokio::spawn(async move {
            tx.closed().await;
            if let Err(e) = listener.shutdown().await {
                tracing::warn!(collection, error = %e, "Listener shutdown failed");
            }
            tracing::debug!(collection, "Live query closed");
        });

        tracing::debug!(collection, "Live query opened");
        Ok(rx)
    }
}
