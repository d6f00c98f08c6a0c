//! In-memory snapshot store
//!
//! Keeps snapshots in a mutex-guarded map. Useful for tests and for
//! running the engine without a data directory; nothing survives the
//! process.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::ports::{Snapshot, SnapshotStore, StoreError, StoreResult};

/// Ephemeral snapshot store
#[derive(Default)]
pub struct InMemoryStore {
    snapshots: Mutex<HashMap<String, Snapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every snapshot saved so far, sorted
    pub fn snapshot_names(&self) -> Vec<String> {
        let guard = self
            .snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SnapshotStore for InMemoryStore {
    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()> {
        let mut guard = self
            .snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(name.to_string(), snapshot.clone());
        Ok(())
    }

    fn restore(&self, name: &str) -> StoreResult<Snapshot> {
        let guard = self
            .snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })
    }
}
