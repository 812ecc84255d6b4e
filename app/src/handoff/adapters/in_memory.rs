use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::handoff::store::{HandoffStore, SearchCriteria};

/// In-memory implementation of HandoffStore
///
/// Nothing survives the process; a fresh store starts empty.
#[derive(Debug, Default)]
pub struct InMemoryHandoffStore {
    slot: Mutex<Option<SearchCriteria>>,
}

impl InMemoryHandoffStore {
    /// Create a new, empty InMemoryHandoffStore
    pub fn new() -> Self {
        Self::default()
    }

    // Option::replace / take cannot leave the slot half written, so a
    // poisoned lock still guards a consistent value.
    fn slot(&self) -> MutexGuard<'_, Option<SearchCriteria>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HandoffStore for InMemoryHandoffStore {
    fn publish(&self, criteria: SearchCriteria) {
        let replaced = self.slot().replace(criteria);
        if replaced.is_some() {
            debug!("Published search criteria over an unconsumed handoff");
        } else {
            debug!("Published search criteria");
        }
    }

    fn consume(&self) -> Option<SearchCriteria> {
        let taken = self.slot().take();
        if taken.is_some() {
            debug!("Consumed pending search criteria");
        }
        taken
    }

    fn peek(&self) -> Option<SearchCriteria> {
        self.slot().clone()
    }
}
