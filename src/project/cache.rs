use crate::error::ExplorerError;
use crate::model::{CommitGraph, ProjectHandle};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

type Outcome = Result<Arc<CommitGraph>, ExplorerError>;
type Slot = Arc<OnceCell<Outcome>>;

/// Received commits keyed by project name.
///
/// Each project has one slot holding the outcome of a single fetch. The
/// first caller runs the fetch while concurrent callers block on the slot
/// and share its outcome, error included. A failed slot is then detached
/// from the map so the next call retries.
#[derive(Debug, Default)]
pub struct CommitCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl CommitCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, handle: &ProjectHandle) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(handle.name.clone()).or_default().clone()
    }

    /// Returns the cached commit or runs `fetch` to obtain it.
    pub fn get_or_fetch<F>(&self, handle: &ProjectHandle, fetch: F) -> Outcome
    where
        F: FnOnce() -> Result<CommitGraph, ExplorerError>,
    {
        let slot = self.slot(handle);
        if let Some(Ok(graph)) = slot.get() {
            debug!(project = %handle.name, "commit cache hit");
            return Ok(Arc::clone(graph));
        }

        let outcome = slot.get_or_init(|| fetch().map(Arc::new)).clone();
        if outcome.is_err() {
            self.detach(handle, &slot);
        }
        outcome
    }

    /// Removes `slot` from the map unless a newer slot already replaced it.
    fn detach(&self, handle: &ProjectHandle, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots
            .get(&handle.name)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(&handle.name);
            debug!(project = %handle.name, "dropped failed fetch");
        }
    }

    #[must_use]
    pub fn get(&self, handle: &ProjectHandle) -> Option<Arc<CommitGraph>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(&handle.name).and_then(cached).cloned()
    }

    /// Drops the cached commit. Returns whether one was cached.
    pub fn invalidate(&self, handle: &ProjectHandle) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = slots
            .remove(&handle.name)
            .is_some_and(|slot| cached(&slot).is_some());
        debug!(project = %handle.name, removed, "invalidated commit cache");
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| cached(slot).is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cached(slot: &Slot) -> Option<&Arc<CommitGraph>> {
    slot.get().and_then(|outcome| outcome.as_ref().ok())
}
