//! JSON file snapshot store
//!
//! Implements the SnapshotStore port with one `<name>.json` file per
//! snapshot under a root directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::ports::{Snapshot, SnapshotStore, StoreError, StoreResult};

/// File-backed snapshot store
///
/// Writes go through a tempfile in the same directory and a rename, so
/// a crash mid-save never leaves a half-written snapshot behind.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Store snapshots under `root`; the directory is created on first
    /// save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn write_error(name: &str, err: impl ToString) -> StoreError {
        StoreError::Write {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, name: &str, snapshot: &Snapshot) -> StoreResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| Self::write_error(name, e))?;

        let mut content =
            serde_json::to_string_pretty(snapshot).map_err(|e| Self::write_error(name, e))?;
        content.push('\n');

        let mut temp =
            NamedTempFile::new_in(&self.root).map_err(|e| Self::write_error(name, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| Self::write_error(name, e))?;
        temp.persist(self.snapshot_path(name))
            .map_err(|e| Self::write_error(name, e))?;
        Ok(())
    }

    fn restore(&self, name: &str) -> StoreResult<Snapshot> {
        let path = self.snapshot_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(err) => {
                return Err(StoreError::Corrupt {
                    name: name.to_string(),
                    reason: format!("unreadable: {err}"),
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
