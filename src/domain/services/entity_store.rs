//! EntityStore - uid-keyed, insertion-ordered entity collection
//!
//! One store per entity kind (books, members). Backed by a `Vec` so
//! iteration and snapshots keep the order entities were registered in.

use std::sync::Arc;

use crate::domain::entities::{Entity, Member};
use crate::domain::ports::{
    Notifiable, NotifiableDirectory, RecordSource, Snapshot, SnapshotStore, SnapshotValue,
};
use crate::domain::services::corrupt_snapshot;
use crate::error::{CirculationError, CirculationResult};

/// Insertion-ordered collection of entities, persisted as one snapshot
pub struct EntityStore<T: Entity> {
    name: String,
    entries: Vec<T>,
    store: Arc<dyn SnapshotStore>,
}

impl<T: Entity> EntityStore<T> {
    /// Create an empty store persisting under `name`
    pub fn new(name: impl Into<String>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            store,
        }
    }

    /// Register a new entity; uids are unique per store
    pub fn add(&mut self, entity: T) -> CirculationResult<()> {
        if self.find(entity.uid()).is_some() {
            return Err(CirculationError::DuplicateKey {
                kind: T::KIND,
                uid: entity.uid().to_string(),
            });
        }
        self.entries.push(entity);
        Ok(())
    }

    /// Look up an entity, failing when it is not registered
    pub fn get(&self, uid: &str) -> CirculationResult<&T> {
        self.find(uid).ok_or_else(|| CirculationError::NotFound {
            kind: T::KIND,
            uid: uid.to_string(),
        })
    }

    pub(crate) fn get_mut(&mut self, uid: &str) -> CirculationResult<&mut T> {
        match self.entries.iter_mut().find(|entity| entity.uid() == uid) {
            Some(entity) => Ok(entity),
            None => Err(CirculationError::NotFound {
                kind: T::KIND,
                uid: uid.to_string(),
            }),
        }
    }

    /// Non-erroring probe
    pub fn find(&self, uid: &str) -> Option<&T> {
        self.entries.iter().find(|entity| entity.uid() == uid)
    }

    /// Entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next free uid: one past the highest numeric uid in the store
    ///
    /// Non-numeric uids are ignored; an empty store starts at "1".
    pub fn next_uid(&self) -> String {
        let highest = self
            .entries
            .iter()
            .filter_map(|entity| entity.uid().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (highest + 1).to_string()
    }

    /// Drain a record source into the store, returning how many entities
    /// were added
    pub fn seed(&mut self, source: &mut dyn RecordSource) -> CirculationResult<usize> {
        let mut added = 0;
        while let Some(fields) = source.next_record()? {
            let entity = T::from_fields(&fields)?;
            self.add(entity)?;
            added += 1;
        }
        Ok(added)
    }

    /// Persist the whole store as one snapshot, keyed by uid
    pub fn save(&self) -> CirculationResult<()> {
        let mut snapshot = Snapshot::new();
        for entity in &self.entries {
            snapshot.push(entity.uid(), SnapshotValue::Record(entity.to_record()));
        }
        self.store.save(&self.name, &snapshot)?;
        Ok(())
    }

    /// Replace in-memory state from the stored snapshot
    ///
    /// On any failure the current state is left untouched.
    pub fn restore(&mut self) -> CirculationResult<()> {
        let snapshot = self.store.restore(&self.name)?;
        let mut entries = Vec::with_capacity(snapshot.len());
        for (entry_name, value) in snapshot.iter() {
            let record = match value {
                SnapshotValue::Record(record) => record.clone(),
                _ => {
                    return Err(corrupt_snapshot(
                        &self.name,
                        format!("entry '{entry_name}' is not a single record"),
                    ))
                }
            };
            match T::from_record(record) {
                Some(entity) => entries.push(entity),
                None => {
                    return Err(corrupt_snapshot(
                        &self.name,
                        format!("entry '{entry_name}' is not a {} record", T::KIND),
                    ))
                }
            }
        }
        self.entries = entries;
        Ok(())
    }
}

impl NotifiableDirectory for EntityStore<Member> {
    fn notifiable(&self, uid: &str) -> Option<&dyn Notifiable> {
        self.find(uid).map(|member| member as &dyn Notifiable)
    }
}
