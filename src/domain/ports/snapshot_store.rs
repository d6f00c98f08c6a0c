//! SnapshotStore port - abstraction for snapshot persistence
//!
//! Components hand the store a named `Snapshot` and get it back on
//! restore. The domain never learns where or how snapshots are kept;
//! the infrastructure layer provides concrete stores.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::entities::Record;

/// Result type for snapshot store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot store operation errors
#[derive(Debug)]
pub enum StoreError {
    /// No snapshot with this name has been saved
    NotFound { name: String },
    /// The snapshot could not be written
    Write { name: String, reason: String },
    /// The snapshot exists but cannot be decoded
    Corrupt { name: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { name } => write!(f, "no snapshot named '{name}'"),
            StoreError::Write { name, reason } => {
                write!(f, "failed to write snapshot '{name}': {reason}")
            }
            StoreError::Corrupt { name, reason } => {
                write!(f, "snapshot '{name}' is corrupt: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// One value in a snapshot
///
/// Untagged on the wire: a single record is a JSON object, the other two
/// are arrays. `Subscribers` is tried before `Sequence` so an empty
/// array restores as an empty subscriber list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Record(Record),
    Subscribers(Vec<String>),
    Sequence(Vec<Record>),
}

/// An ordered name -> value mapping handed to the store
///
/// Entry order is part of the format: stores must give back entries in
/// the order they were saved, so `restore(save(x)) == x`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    entries: Vec<(String, SnapshotValue)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; callers keep names unique
    pub fn push(&mut self, name: impl Into<String>, value: SnapshotValue) {
        self.entries.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&SnapshotValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of snapshot entries")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Snapshot, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, SnapshotValue>()? {
                    entries.push((name, value));
                }
                Ok(Snapshot { entries })
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Abstract store for named snapshots
///
/// Implemented by the infrastructure layer; every stateful component
/// holds one behind an `Arc` and saves after committed operations.
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot under `name`, replacing any previous one
    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()>;

    /// Fetch the snapshot saved under `name`
    fn restore(&self, name: &str) -> StoreResult<Snapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Book;

    #[test]
    fn store_error_display() {
        let err = StoreError::Corrupt {
            name: "loans".to_string(),
            reason: "bad json".to_string(),
        };
        assert!(err.to_string().contains("loans"));
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn entry_order_survives_the_wire() {
        let mut snapshot = Snapshot::new();
        snapshot.push("b", SnapshotValue::Subscribers(vec!["4".to_string()]));
        snapshot.push("a", SnapshotValue::Subscribers(vec![]));
        snapshot.push("c", SnapshotValue::Subscribers(vec!["5".to_string()]));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        let names: Vec<&str> = back.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(back, snapshot);
    }

    #[test]
    fn empty_array_restores_as_subscribers() {
        let value: SnapshotValue = serde_json::from_str("[]").unwrap();
        assert_eq!(value, SnapshotValue::Subscribers(vec![]));
    }

    #[test]
    fn record_values_keep_their_tag() {
        let mut snapshot = Snapshot::new();
        snapshot.push(
            "1",
            SnapshotValue::Record(Record::Book(Book::new("1", "Dune", "Frank Herbert", "Sci-fi"))),
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"record\":\"book\""));

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn record_sequences_restore_as_sequences() {
        let records = vec![
            Record::Book(Book::new("1", "Dune", "Frank Herbert", "Sci-fi")),
            Record::Book(Book::new("2", "Emma", "Jane Austen", "Classic")),
        ];
        let json = serde_json::to_string(&SnapshotValue::Sequence(records.clone())).unwrap();
        let back: SnapshotValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SnapshotValue::Sequence(records));
    }
}
