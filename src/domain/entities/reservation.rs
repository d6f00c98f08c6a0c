//! Reservation records - one queue entry per waiting member

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Date;

/// A member's place in a book's reservation queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    book_uid: String,
    member_uid: String,
    date_made: Date,
}

impl ReservationRecord {
    pub fn new(
        book_uid: impl Into<String>,
        member_uid: impl Into<String>,
        date_made: Date,
    ) -> Self {
        Self {
            book_uid: book_uid.into(),
            member_uid: member_uid.into(),
            date_made,
        }
    }

    pub fn book_uid(&self) -> &str {
        &self.book_uid
    }

    pub fn member_uid(&self) -> &str {
        &self.member_uid
    }

    pub fn date_made(&self) -> Date {
        self.date_made
    }
}
