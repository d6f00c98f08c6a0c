//! Lending Use Case
//!
//! The circulation desk in code form. Checkout, return, reserve, and
//! the membership paperwork around them, each backed by the domain
//! services and snapshotted after every change.
//!
//! ## Structure
//!
//! - `engine` - The `LendingEngine` facade and its operations
//! - `policy` - Circulation rules (loan limits, fines)
//! - `outcome` - Per-operation reports returned to callers
//!
//! ## Usage
//!
//! ```ignore
//! let store = Arc::new(JsonFileStore::new("/var/lib/library"));
//! let mut engine = LendingEngine::new(store);
//! engine.restore_all();
//!
//! let summary = engine.checkout("17", &["401", "402"], Date::today())?;
//! for declined in &summary.declined {
//!     println!("{}: {}", declined.book_uid, declined.reason);
//! }
//! ```

mod engine;
mod outcome;
mod policy;

pub use engine::{LendingEngine, LOANS_EVENT, NEW_CARDS_EVENT, RESERVATIONS_EVENT};
pub use outcome::{
    CardIssueOutcome, CheckoutSummary, DeclineReason, DeclinedItem, EnrollmentOutcome, IssuedCard,
    PaymentOutcome, ReservationOutcome, ReturnOutcome, SeedOutcome,
};
pub use policy::LendingPolicy;

#[cfg(test)]
mod tests;
