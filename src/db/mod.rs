//! Database layer: a collection-scoped document store with live queries.
//!
//! Two backends implement [`DocumentStore`]: Firestore for deployments and an
//! in-process [`MemoryStore`] for tests and local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::error::AppError;

/// Collection names as constants.
pub mod collections {
    /// Profiles, keyed by identity uid
    pub const USERS: &str = "users";
    pub const ROUTINES: &str = "routines";
    pub const WEIGHTS: &str = "weights";
    pub const COMPLETED_ROUTINES: &str = "completedRoutines";
    pub const CUSTOM_ROUTINES: &str = "customRoutines";
    /// Push delivery tokens, keyed by the token itself
    pub const PUSH_TOKENS: &str = "pushTokens";
}

/// Field holding the owner's email on every owned document.
pub const OWNER_FIELD: &str = "userEmail";

/// Stored document body (the ID is not part of it).
pub type Fields = serde_json::Map<String, Value>;

/// Full result set of a live query.
pub type Snapshot = Vec<Document>;

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Owner email, if the document carries one.
    pub fn owner(&self) -> Option<&str> {
        self.fields.get(OWNER_FIELD).and_then(Value::as_str)
    }

    /// Decode into an entity type, exposing the document ID as `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
    }
}

/// Serialize a value into a document body.
pub fn encode<T: Serialize>(value: &T) -> Result<Fields, AppError> {
    match serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "document body must be an object, got {other}"
        ))),
    }
}

/// Equality filter on the owner field of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerQuery {
    pub collection: &'static str,
    pub owner: String,
}

impl OwnerQuery {
    pub fn new(collection: &'static str, owner: impl Into<String>) -> Self {
        Self {
            collection,
            owner: owner.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.owner() == Some(self.owner.as_str())
    }
}

/// Remote document store.
///
/// `watch` returns a receiver whose current value is the snapshot at the time
/// of the call; every later change to the matching set replaces it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Append a document with a store-assigned ID.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, AppError>;

    /// Create or fully replace the document at `id`.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), AppError>;

    /// Delete the document at `id`. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;

    async fn query(&self, query: &OwnerQuery) -> Result<Snapshot, AppError>;

    async fn watch(&self, query: &OwnerQuery) -> Result<watch::Receiver<Snapshot>, AppError>;
}
