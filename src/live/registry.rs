// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-identity registry of open subscriptions, used to tear them all down on sign-out.

use dashmap::DashMap;

use crate::live::CancelHandle;
use crate::models::Identity;

/// Open subscriptions keyed by identity uid.
#[derive(Default)]
pub struct LiveRegistry {
    handles: DashMap<String, Vec<CancelHandle>>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription opened on behalf of `identity`.
    ///
    /// Identities whose subscriptions have all ended are dropped first.
    pub fn track(&self, identity: &Identity, handle: CancelHandle) {
        self.prune();
        self.handles
            .entry(identity.uid.clone())
            .or_default()
            .push(handle);
    }

    /// Drop cancelled handles, and identities left with none.
    fn prune(&self) {
        self.handles.retain(|_, handles| {
            handles.retain(|h| !h.is_cancelled());
            !handles.is_empty()
        });
    }

    /// Number of identities with at least one registered subscription.
    pub fn tracked_identities(&self) -> usize {
        self.handles.len()
    }

    /// Number of subscriptions still open for `identity`.
    pub fn active_count(&self, identity: &Identity) -> usize {
        self.handles
            .get(&identity.uid)
            .map(|handles| handles.iter().filter(|h| !h.is_cancelled()).count())
            .unwrap_or(0)
    }

    /// Number of subscriptions still open across all identities.
    pub fn total_count(&self) -> usize {
        self.handles
            .iter()
            .map(|entry| entry.value().iter().filter(|h| !h.is_cancelled()).count())
            .sum()
    }

    /// Cancel every subscription registered for `identity`. Returns how many were open.
    pub fn cancel_all(&self, identity: &Identity) -> usize {
        let Some((_, handles)) = self.handles.remove(&identity.uid) else {
            return 0;
        };

        let mut cancelled = 0;
        for handle in handles {
            if !handle.is_cancelled() {
                handle.cancel();
                cancelled += 1;
            }
        }

        tracing::debug!(uid = %identity.uid, cancelled, "Cancelled live subscriptions");
        cancelled
    }
}
