//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod notifiable;
pub mod record_source;
pub mod snapshot_store;

pub use notifiable::{DeliveryError, Notifiable, NotifiableDirectory, Notice};
pub use record_source::{require_field, FieldMap, RecordSource};
pub use snapshot_store::{Snapshot, SnapshotStore, SnapshotValue, StoreError, StoreResult};
