//! Circulate - library circulation engine
//!
//! Circulate keeps a lending library honest: who holds which book, who
//! is queued for it, what fines are owed, and which notices members
//! should receive. Every change is snapshotted through a pluggable
//! store so the whole state survives a restart.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    CardIssueOutcome, CheckoutSummary, DeclineReason, DeclinedItem, EnrollmentOutcome, IssuedCard,
    LendingEngine, LendingPolicy, PaymentOutcome, ReservationOutcome, ReturnOutcome, SeedOutcome,
};
pub use domain::entities::{
    Book, BookStatus, Entity, LoanKey, LoanRecord, Member, Record, ReservationRecord,
};
pub use domain::ports::{
    FieldMap, Notice, RecordSource, Snapshot, SnapshotStore, SnapshotValue, StoreError,
};
pub use domain::services::{
    EntityStore, LoanLedger, NotificationHub, PublishOutcome, ReservationQueue,
};
pub use domain::value_objects::Date;
pub use error::{CirculationError, CirculationResult};
pub use infrastructure::import::DelimitedRecordSource;
pub use infrastructure::stores::{InMemoryStore, JsonFileStore};
