//! Domain Entities
//!
//! Core domain entities that have identity and lifecycle.
//! - `Book` - A catalogue item with an availability status
//! - `Member` - A registered borrower
//! - `LoanRecord` - One lending of a book to a member
//! - `ReservationRecord` - A place in a book's reservation queue
//! - `Record` - The tagged union all of the above persist as

mod book;
mod loan;
mod member;
mod record;
mod reservation;

pub use book::{Book, BookStatus};
pub use loan::{LoanKey, LoanRecord};
pub use member::{Member, AWAITING_CARD};
pub use record::Record;
pub use reservation::ReservationRecord;

use crate::domain::ports::FieldMap;

/// Behaviour shared by entities kept in an `EntityStore`
///
/// `KIND` names the entity in error messages and matches the record
/// discriminant tag.
pub trait Entity: Clone {
    const KIND: &'static str;

    /// The identifier the store keys this entity by
    fn uid(&self) -> &str;

    /// Wrap into the tagged record union for persistence
    fn to_record(&self) -> Record;

    /// Unwrap from a record; `None` when the record is a different kind
    fn from_record(record: Record) -> Option<Self>
    where
        Self: Sized;

    /// Build from a raw imported field map
    fn from_fields(fields: &FieldMap) -> anyhow::Result<Self>
    where
        Self: Sized;
}
