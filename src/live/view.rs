// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-screen view models kept current by live subscriptions.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::error::AppError;
use crate::live::{LiveRegistry, Subscription};
use crate::models::stats::sort_chronologically;
use crate::models::{
    CompletedRoutineRecord, CustomRoutine, Identity, ProgressCharts, Routine, WeightSample,
};
use crate::repository::{EntityRepository, OwnedEntity, Repositories};

/// Latest snapshot of one live query. Each push replaces the whole list.
struct LiveList<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Clone + Send + Sync + 'static> LiveList<T> {
    fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn snapshot(&self) -> Vec<T> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Callback that stores a pushed snapshot and bumps the change counter.
    fn updater(&self, changes: &Arc<watch::Sender<u64>>) -> impl Fn(Vec<T>) + Send + Sync + 'static {
        let items = Arc::clone(&self.items);
        let changes = Arc::clone(changes);
        move |snapshot| {
            *items.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
            changes.send_modify(|version| *version += 1);
        }
    }
}

/// Open a subscription feeding `list` and register it for `identity`.
async fn attach<E>(
    repo: &EntityRepository<E>,
    list: &LiveList<E>,
    changes: &Arc<watch::Sender<u64>>,
    identity: &Identity,
    registry: &LiveRegistry,
) -> Result<Subscription, AppError>
where
    E: OwnedEntity + Clone,
{
    let subscription = repo
        .subscribe(&identity.email, list.updater(changes))
        .await?;
    registry.track(identity, subscription.handle());
    Ok(subscription)
}

/// Live list of one entity kind for the signed-in user.
pub struct ListView<E> {
    list: LiveList<E>,
    changes: watch::Receiver<u64>,
    subscriptions: Vec<Subscription>,
}

/// Routines screen.
pub type RoutinesView = ListView<Routine>;

/// Custom routines screen.
pub type CustomRoutinesView = ListView<CustomRoutine>;

impl<E: OwnedEntity + Clone> ListView<E> {
    /// Subscribe to the owner's documents. The view holds the current set on return.
    pub async fn mount(
        repo: &EntityRepository<E>,
        identity: &Identity,
        registry: &LiveRegistry,
    ) -> Result<Self, AppError> {
        let (tx, mut changes) = watch::channel(0u64);
        let tx = Arc::new(tx);
        let list = LiveList::new();

        let subscription = attach(repo, &list, &tx, identity, registry).await?;
        changes.borrow_and_update();

        Ok(Self {
            list,
            changes,
            subscriptions: vec![subscription],
        })
    }

    pub fn items(&self) -> Vec<E> {
        self.list.snapshot()
    }

    /// Change feed: ticks after every push, closes once all subscriptions are cancelled.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    pub fn unmount(self) {
        drop(self);
    }
}

/// Progress screen: weight samples plus completed routines.
pub struct ProgressView {
    weights: LiveList<WeightSample>,
    completed: LiveList<CompletedRoutineRecord>,
    changes: watch::Receiver<u64>,
    subscriptions: Vec<Subscription>,
}

impl ProgressView {
    pub async fn mount(
        repos: &Repositories,
        identity: &Identity,
        registry: &LiveRegistry,
    ) -> Result<Self, AppError> {
        let (tx, mut changes) = watch::channel(0u64);
        let tx = Arc::new(tx);
        let weights = LiveList::new();
        let completed = LiveList::new();

        let subscriptions = vec![
            attach(&repos.weights, &weights, &tx, identity, registry).await?,
            attach(&repos.completed, &completed, &tx, identity, registry).await?,
        ];
        changes.borrow_and_update();

        Ok(Self {
            weights,
            completed,
            changes,
            subscriptions,
        })
    }

    /// Weight samples in chronological order.
    pub fn weights(&self) -> Vec<WeightSample> {
        sort_chronologically(self.weights.snapshot())
    }

    /// Completed routines in chronological order.
    pub fn completed(&self) -> Vec<CompletedRoutineRecord> {
        sort_chronologically(self.completed.snapshot())
    }

    pub fn charts(&self, label_format: &str) -> ProgressCharts {
        let (weights, completed) = self.snapshot();
        ProgressCharts::build(weights, completed, label_format)
    }

    /// Current weight samples and completed routines, unsorted, read once.
    pub fn snapshot(&self) -> (Vec<WeightSample>, Vec<CompletedRoutineRecord>) {
        (self.weights.snapshot(), self.completed.snapshot())
    }

    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    pub fn unmount(self) {
        drop(self);
    }
}
