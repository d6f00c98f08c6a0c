//! Book entity - a catalogue item that can be lent and reserved

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Entity, Record};
use crate::domain::ports::{require_field, FieldMap};

/// Availability of a catalogue item
///
/// Transitions are driven by the lending operations; nothing outside the
/// crate flips a book's status directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    /// On the shelf, free to borrow
    Available,
    /// Checked out to a member
    #[serde(rename = "On loan")]
    OnLoan,
    /// Held for the front of a reservation queue
    Reserved,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookStatus::Available => write!(f, "Available"),
            BookStatus::OnLoan => write!(f, "On loan"),
            BookStatus::Reserved => write!(f, "Reserved"),
        }
    }
}

/// A catalogue item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    uid: String,
    title: String,
    author: String,
    genre: String,
    status: BookStatus,
}

impl Book {
    /// Create a new book, available for loan
    pub fn new(
        uid: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            status: BookStatus::Available,
        }
    }

    // --- Getters ---

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    // --- Status transitions (crate-internal) ---

    pub(crate) fn set_available(&mut self) {
        self.status = BookStatus::Available;
    }

    pub(crate) fn set_on_loan(&mut self) {
        self.status = BookStatus::OnLoan;
    }

    pub(crate) fn set_reserved(&mut self) {
        self.status = BookStatus::Reserved;
    }
}

impl Entity for Book {
    const KIND: &'static str = "book";

    fn uid(&self) -> &str {
        &self.uid
    }

    fn to_record(&self) -> Record {
        Record::Book(self.clone())
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Book(book) => Some(book),
            _ => None,
        }
    }

    fn from_fields(fields: &FieldMap) -> anyhow::Result<Self> {
        Ok(Book::new(
            require_field(fields, "uid")?,
            require_field(fields, "title")?,
            require_field(fields, "author")?,
            require_field(fields, "genre")?,
        ))
    }
}
