// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entity repositories over the document store.
//!
//! Each owned entity kind gets an [`EntityRepository`] that validates drafts
//! before writing, tags documents with the owner email, and restricts every
//! read and live query to that owner.

pub mod profile;

pub use profile::ProfileRepository;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::db::{collections, encode, DocumentStore, Fields, OwnerQuery, Snapshot, OWNER_FIELD};
use crate::error::AppError;
use crate::live::Subscription;
use crate::models::routine::CustomRoutineFields;
use crate::models::{
    CompletedRoutineRecord, CustomRoutine, CustomRoutineDraft, NewCompletedRoutine, NewRoutine,
    NewWeightSample, Routine, WeightSample,
};

/// A document kind stored in its own collection and owned by one identity.
pub trait OwnedEntity: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Client-supplied fields for a new document.
    type Draft: Serialize + Validate + Send + Sync;

    /// Build the stored body for a validated draft (owner field excluded).
    fn prepare(draft: &Self::Draft, _now: DateTime<Utc>) -> Result<Fields, AppError> {
        encode(draft)
    }
}

/// Entities that can be deleted by ID.
pub trait Removable: OwnedEntity {}

impl OwnedEntity for Routine {
    const COLLECTION: &'static str = collections::ROUTINES;
    type Draft = NewRoutine;
}

impl Removable for Routine {}

impl OwnedEntity for WeightSample {
    const COLLECTION: &'static str = collections::WEIGHTS;
    type Draft = NewWeightSample;
}

impl OwnedEntity for CompletedRoutineRecord {
    const COLLECTION: &'static str = collections::COMPLETED_ROUTINES;
    type Draft = NewCompletedRoutine;
}

impl OwnedEntity for CustomRoutine {
    const COLLECTION: &'static str = collections::CUSTOM_ROUTINES;
    type Draft = CustomRoutineDraft;

    fn prepare(draft: &Self::Draft, now: DateTime<Utc>) -> Result<Fields, AppError> {
        encode(&CustomRoutineFields {
            draft,
            created_at: now,
        })
    }
}

impl Removable for CustomRoutine {}

/// Who a document belongs to, relative to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Absent,
    Owned,
    Foreign,
}

/// Decode a snapshot, skipping documents that do not fit the entity shape.
fn decode_snapshot<E: OwnedEntity>(snapshot: &Snapshot) -> Vec<E> {
    snapshot
        .iter()
        .filter_map(|doc| match doc.decode::<E>() {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(
                    collection = E::COLLECTION,
                    id = %doc.id,
                    error = %e,
                    "Skipping undecodable document"
                );
                None
            }
        })
        .collect()
}

/// Owner-scoped access to one collection.
pub struct EntityRepository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: OwnedEntity> EntityRepository<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Open a live query over the owner's documents.
    ///
    /// `on_update` receives the current set before this returns, then the full
    /// set again after every change.
    pub async fn subscribe<F>(&self, owner: &str, on_update: F) -> Result<Subscription, AppError>
    where
        F: Fn(Vec<E>) + Send + Sync + 'static,
    {
        let rx = self
            .store
            .watch(&OwnerQuery::new(E::COLLECTION, owner))
            .await?;

        Ok(Subscription::start(rx, move |snapshot| {
            on_update(decode_snapshot(snapshot))
        }))
    }

    /// One-shot read of the owner's documents.
    pub async fn list(&self, owner: &str) -> Result<Vec<E>, AppError> {
        let snapshot = self
            .store
            .query(&OwnerQuery::new(E::COLLECTION, owner))
            .await?;
        Ok(decode_snapshot(&snapshot))
    }

    /// Validate and append a new document. Returns the store-assigned ID.
    pub async fn create(&self, owner: &str, draft: &E::Draft) -> Result<String, AppError> {
        draft.validate()?;

        let mut fields = E::prepare(draft, Utc::now())?;
        fields.insert(OWNER_FIELD.to_string(), Value::String(owner.to_string()));

        let id = self.store.add(E::COLLECTION, fields).await?;
        tracing::info!(collection = E::COLLECTION, id = %id, "Document created");
        Ok(id)
    }

    /// Check who owns the document at `id`.
    pub async fn ownership(&self, owner: &str, id: &str) -> Result<Ownership, AppError> {
        Ok(match self.store.get(E::COLLECTION, id).await? {
            None => Ownership::Absent,
            Some(doc) if doc.owner() == Some(owner) => Ownership::Owned,
            Some(_) => Ownership::Foreign,
        })
    }
}

impl<E: Removable> EntityRepository<E> {
    /// Delete by ID. No existence check is made.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(E::COLLECTION, id).await?;
        tracing::info!(collection = E::COLLECTION, id, "Document removed");
        Ok(())
    }
}

impl EntityRepository<CustomRoutine> {
    /// Replace the whole document at `id`, creating it if missing.
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        draft: &CustomRoutineDraft,
    ) -> Result<(), AppError> {
        draft.validate()?;

        let mut fields = CustomRoutine::prepare(draft, Utc::now())?;
        fields.insert(OWNER_FIELD.to_string(), Value::String(owner.to_string()));

        self.store
            .set(CustomRoutine::COLLECTION, id, fields)
            .await?;
        tracing::info!(collection = CustomRoutine::COLLECTION, id, "Document replaced");
        Ok(())
    }
}

/// All repositories over one store.
#[derive(Clone)]
pub struct Repositories {
    pub profiles: ProfileRepository,
    pub routines: EntityRepository<Routine>,
    pub custom_routines: EntityRepository<CustomRoutine>,
    pub weights: EntityRepository<WeightSample>,
    pub completed: EntityRepository<CompletedRoutineRecord>,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            profiles: ProfileRepository::new(Arc::clone(&store)),
            routines: EntityRepository::new(Arc::clone(&store)),
            custom_routines: EntityRepository::new(Arc::clone(&store)),
            weights: EntityRepository::new(Arc::clone(&store)),
            completed: EntityRepository::new(store),
        }
    }
}
