//! Domain Services
//!
//! The stateful circulation components. Each one persists itself as a
//! named snapshot through the store port it was constructed with.

mod entity_store;
mod ledger;
mod notification_hub;
mod reservation_queue;

pub use entity_store::EntityStore;
pub use ledger::LoanLedger;
pub use notification_hub::{NotificationHub, PublishOutcome};
pub use reservation_queue::ReservationQueue;

use crate::domain::ports::StoreError;
use crate::error::CirculationError;

/// A snapshot decoded but did not hold what this component expected
pub(crate) fn corrupt_snapshot(name: &str, reason: impl Into<String>) -> CirculationError {
    CirculationError::Store(StoreError::Corrupt {
        name: name.to_string(),
        reason: reason.into(),
    })
}
