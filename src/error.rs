//! Error types for the circulation engine
//!
//! Uses `thiserror` for library errors. Port-specific errors (store,
//! delivery) live next to their ports and convert into this type at the
//! boundary.

use thiserror::Error;

use crate::domain::ports::StoreError;

/// Result type alias for circulation operations
pub type CirculationResult<T> = Result<T, CirculationError>;

/// Main error type for circulation operations
#[derive(Error, Debug)]
pub enum CirculationError {
    /// An entity with this uid is already registered
    #[error("duplicate {kind} uid '{uid}'")]
    DuplicateKey { kind: &'static str, uid: String },

    /// Lookup failed
    #[error("no {kind} found for '{uid}'")]
    NotFound { kind: &'static str, uid: String },

    /// The book already has an open loan
    #[error("book '{book_uid}' is already on loan")]
    AlreadyOnLoan { book_uid: String },

    /// No open loan exists for this book/member pair
    #[error("no open loan for book '{book_uid}' by member '{member_uid}'")]
    NoOpenLoan {
        book_uid: String,
        member_uid: String,
    },

    /// Member has unpaid fines and may not borrow
    #[error("member '{member_uid}' owes {amount:.2} in fines")]
    OutstandingFine { member_uid: String, amount: f64 },

    /// Member has reached the loan limit
    #[error("member '{member_uid}' already has {limit} items on loan")]
    MaxLoansExceeded { member_uid: String, limit: u32 },

    /// The book is not currently on loan
    #[error("book '{book_uid}' is not on loan")]
    NotOnLoan { book_uid: String },

    /// No reservations are queued for this book
    #[error("no reservations for book '{book_uid}'")]
    EmptyQueue { book_uid: String },

    /// The event has not been declared on the notification hub
    #[error("event '{event}' has not been declared")]
    UnknownEvent { event: String },

    /// Snapshot store failure
    #[error("snapshot store: {0}")]
    Store(#[from] StoreError),

    /// Failure while reading an external record source
    #[error(transparent)]
    Import(#[from] anyhow::Error),
}
