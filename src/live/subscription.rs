// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cancellable delivery of live query snapshots to a callback.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use crate::db::Snapshot;

type Callback = Box<dyn Fn(&Snapshot) + Send + Sync>;
type Slot = Arc<Mutex<Option<Callback>>>;

/// Invoke the callback if it is still installed. Returns false once cancelled.
fn deliver(slot: &Slot, snapshot: &Snapshot) -> bool {
    let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_ref() {
        Some(callback) => {
            callback(snapshot);
            true
        }
        None => false,
    }
}

fn clear(slot: &Slot, abort: &AbortHandle) -> bool {
    // Taking the callback waits for an in-flight delivery to finish
    let previous = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    abort.abort();
    previous.is_some()
}

/// An open live query bound to a callback.
///
/// The callback runs once with the current snapshot before [`Subscription::start`]
/// returns, then once per change on a background task. After [`cancel`] returns
/// (or the subscription is dropped) it is never invoked again.
///
/// A callback must not cancel its own subscription.
///
/// [`cancel`]: Subscription::cancel
pub struct Subscription {
    slot: Slot,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Start delivering snapshots from `rx` to `on_update`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(mut rx: watch::Receiver<Snapshot>, on_update: F) -> Self
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let slot: Slot = Arc::new(Mutex::new(Some(Box::new(on_update))));

        let initial = rx.borrow_and_update().clone();
        deliver(&slot, &initial);

        let task_slot = Arc::clone(&slot);
        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if !deliver(&task_slot, &snapshot) {
                    break;
                }
            }
        });

        Self { slot, task }
    }

    /// Handle that can cancel this subscription from elsewhere.
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            slot: Arc::clone(&self.slot),
            abort: self.task.abort_handle(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop delivery and close the underlying live query.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if clear(&self.slot, &self.task.abort_handle()) {
            tracing::trace!("Subscription cancelled");
        }
    }
}

/// Detached cancellation handle for a [`Subscription`].
#[derive(Clone)]
pub struct CancelHandle {
    slot: Slot,
    abort: AbortHandle,
}

impl CancelHandle {
    pub fn cancel(&self) {
        clear(&self.slot, &self.abort);
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
