//! Lending Outcomes
//!
//! What each engine operation reports back. Persistence problems never
//! abort an operation; they arrive here as `warnings`.

use std::fmt;

use crate::domain::entities::BookStatus;
use crate::error::CirculationError;

/// Why a checkout line item was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineReason {
    /// Another member currently holds the book
    OnLoanTo { member_uid: String },
    /// The book is held for someone ahead in its reservation queue;
    /// `position` is the declined member's own slot, `None` when they
    /// hold none
    ReservedByAnother { position: Option<usize> },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::OnLoanTo { member_uid } => {
                write!(f, "on loan to member '{member_uid}'")
            }
            DeclineReason::ReservedByAnother { position: Some(position) } => {
                write!(f, "reserved by another member (queue position {position})")
            }
            DeclineReason::ReservedByAnother { position: None } => {
                write!(f, "reserved by another member; a reservation can be requested")
            }
        }
    }
}

/// A checkout line item the engine would not lend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclinedItem {
    pub book_uid: String,
    pub reason: DeclineReason,
}

/// Result of a multi-book checkout
#[derive(Debug, Default)]
pub struct CheckoutSummary {
    /// Member the books were lent to
    pub member_uid: String,
    /// Books now on loan to the member, in request order
    pub loaned: Vec<String>,
    /// Books refused, each with the reason
    pub declined: Vec<DeclinedItem>,
    /// Set when the loan limit stopped the batch early; earlier loans
    /// in the batch stand
    pub halted: Option<CirculationError>,
    pub warnings: Vec<String>,
}

impl CheckoutSummary {
    pub(crate) fn new(member_uid: impl Into<String>) -> Self {
        Self {
            member_uid: member_uid.into(),
            ..Self::default()
        }
    }

    /// True when every requested book went out on loan
    pub fn all_loaned(&self) -> bool {
        self.declined.is_empty() && self.halted.is_none()
    }
}

/// Result of returning a single book
#[derive(Debug)]
pub struct ReturnOutcome {
    pub book_uid: String,
    /// Member who held the loan
    pub member_uid: String,
    /// Whole days the loan ran
    pub duration_days: i64,
    /// Fine assessed, when the loan ran over the limit
    pub fine: Option<f64>,
    /// Shelf status after the return
    pub next_status: BookStatus,
    /// Front of the reservation queue, told the book is ready
    pub notified_reserver: Option<String>,
    pub warnings: Vec<String>,
}

impl ReturnOutcome {
    pub fn was_overdue(&self) -> bool {
        self.fine.is_some()
    }
}

/// Result of placing a reservation
#[derive(Debug)]
pub struct ReservationOutcome {
    pub book_uid: String,
    pub member_uid: String,
    /// Zero-based place in the queue
    pub position: usize,
    /// True when the book sits on the shelf and the member is front of
    /// the queue
    pub available_now: bool,
    /// True when the member was auto-enrolled to take the reservation
    pub enrolled: bool,
    pub warnings: Vec<String>,
}

/// Result of enrolling a new member
#[derive(Debug)]
pub struct EnrollmentOutcome {
    /// Uid the engine allocated
    pub member_uid: String,
    pub warnings: Vec<String>,
}

/// A membership card produced by an issuing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCard {
    pub member_uid: String,
    pub card_number: String,
}

/// Result of a card issuing run
#[derive(Debug, Default)]
pub struct CardIssueOutcome {
    pub issued: Vec<IssuedCard>,
    pub warnings: Vec<String>,
}

/// Result of paying down a fine
#[derive(Debug)]
pub struct PaymentOutcome {
    pub member_uid: String,
    /// Fine balance left after the payment
    pub remaining: f64,
    pub warnings: Vec<String>,
}

impl PaymentOutcome {
    pub fn settled(&self) -> bool {
        self.remaining == 0.0
    }
}

/// Result of seeding a store from a record source
#[derive(Debug)]
pub struct SeedOutcome {
    /// Entities added to the store
    pub added: usize,
    pub warnings: Vec<String>,
}
