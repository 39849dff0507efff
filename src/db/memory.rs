// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Same observable behaviour as Firestore for the operations this crate uses:
//! store-assigned IDs, full-replace `set`, and live queries that push the full
//! matching set after every change. Used by the test suite and for local
//! development without an emulator.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;

use crate::db::{Document, DocumentStore, Fields, OwnerQuery, Snapshot};
use crate::error::AppError;

struct Watcher {
    query: OwnerQuery,
    tx: watch::Sender<Snapshot>,
}

#[derive(Default)]
struct Collection {
    /// Documents in insertion order
    docs: Vec<Document>,
    watchers: Vec<Watcher>,
}

impl Collection {
    fn snapshot(&self, query: &OwnerQuery) -> Snapshot {
        self.docs
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect()
    }

    /// Push the new matching set to every live query whose result changed.
    fn notify(&mut self) {
        self.watchers.retain(|w| !w.tx.is_closed());

        for watcher in &self.watchers {
            let snapshot: Snapshot = self
                .docs
                .iter()
                .filter(|doc| watcher.query.matches(doc))
                .cloned()
                .collect();
            watcher.tx.send_if_modified(|current| {
                if *current == snapshot {
                    return false;
                }
                *current = snapshot;
                true
            });
        }
    }
}

#[derive(Default)]
struct Inner {
    collections: DashMap<String, Collection>,
    offline: AtomicBool,
    writes: AtomicU64,
}

/// In-memory [`DocumentStore`]. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage: every operation fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of acknowledged writes (add, set, delete).
    pub fn writes(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Number of live queries that still have a receiver.
    pub fn active_watchers(&self) -> usize {
        self.inner
            .collections
            .iter()
            .map(|c| c.watchers.iter().filter(|w| !w.tx.is_closed()).count())
            .sum()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database("Document store unavailable".to_string()));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        self.check_online()?;
        Ok(self
            .inner
            .collections
            .get(collection)
            .and_then(|c| c.docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, AppError> {
        self.check_online()?;
        let id = uuid::Uuid::new_v4().simple().to_string();

        let mut entry = self
            .inner
            .collections
            .entry(collection.to_string())
            .or_default();
        entry.docs.push(Document::new(id.clone(), fields));
        entry.notify();
        drop(entry);

        self.record_write();
        tracing::debug!(collection, id = %id, "Document added");
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), AppError> {
        self.check_online()?;

        let mut entry = self
            .inner
            .collections
            .entry(collection.to_string())
            .or_default();
        match entry.docs.iter().position(|doc| doc.id == id) {
            Some(idx) => entry.docs[idx].fields = fields,
            None => entry.docs.push(Document::new(id, fields)),
        }
        entry.notify();
        drop(entry);

        self.record_write();
        tracing::debug!(collection, id, "Document set");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.check_online()?;

        if let Some(mut entry) = self.inner.collections.get_mut(collection) {
            let before = entry.docs.len();
            entry.docs.retain(|doc| doc.id != id);
            if entry.docs.len() != before {
                entry.notify();
            }
        }

        self.record_write();
        tracing::debug!(collection, id, "Document deleted");
        Ok(())
    }

    async fn query(&self, query: &OwnerQuery) -> Result<Snapshot, AppError> {
        self.check_online()?;
        Ok(self
            .inner
            .collections
            .get(query.collection)
            .map(|c| c.snapshot(query))
            .unwrap_or_default())
    }

    async fn watch(&self, query: &OwnerQuery) -> Result<watch::Receiver<Snapshot>, AppError> {
        self.check_online()?;

        let mut entry = self
            .inner
            .collections
            .entry(query.collection.to_string())
            .or_default();
        let (tx, rx) = watch::channel(entry.snapshot(query));
        entry.watchers.push(Watcher {
            query: query.clone(),
            tx,
        });

        tracing::debug!(collection = query.collection, "Live query opened");
        Ok(rx)
    }
}
