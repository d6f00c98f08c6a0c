//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `LendingEngine` - Checkout, return, reservation, and membership flows

pub mod lending;

pub use lending::{
    CardIssueOutcome, CheckoutSummary, DeclineReason, DeclinedItem, EnrollmentOutcome, IssuedCard,
    LendingEngine, LendingPolicy, PaymentOutcome, ReservationOutcome, ReturnOutcome, SeedOutcome,
    LOANS_EVENT, NEW_CARDS_EVENT, RESERVATIONS_EVENT,
};
