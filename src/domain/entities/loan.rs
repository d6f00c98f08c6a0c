//! Loan records and the composite key that groups them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Date;

/// Identifies the loan history shared by one book/member pair
///
/// A proper composite key: uids may themselves contain separator
/// characters, so the pair is never flattened into a single string for
/// lookups. The `Display` form is only used to label snapshots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoanKey {
    book_uid: String,
    member_uid: String,
}

impl LoanKey {
    pub fn new(book_uid: impl Into<String>, member_uid: impl Into<String>) -> Self {
        Self {
            book_uid: book_uid.into(),
            member_uid: member_uid.into(),
        }
    }

    pub fn book_uid(&self) -> &str {
        &self.book_uid
    }

    pub fn member_uid(&self) -> &str {
        &self.member_uid
    }
}

impl fmt::Display for LoanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.book_uid, self.member_uid)
    }
}

/// One lending of a book to a member
///
/// The record stays open until the book comes back; on the wire an open
/// loan carries return day-count 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    book_uid: String,
    member_uid: String,
    start_date: Date,
    #[serde(with = "open_sentinel")]
    return_date: Option<Date>,
}

impl LoanRecord {
    /// Open a new loan starting on `start_date`
    pub fn new(
        book_uid: impl Into<String>,
        member_uid: impl Into<String>,
        start_date: Date,
    ) -> Self {
        Self {
            book_uid: book_uid.into(),
            member_uid: member_uid.into(),
            start_date,
            return_date: None,
        }
    }

    pub fn book_uid(&self) -> &str {
        &self.book_uid
    }

    pub fn member_uid(&self) -> &str {
        &self.member_uid
    }

    pub fn start_date(&self) -> Date {
        self.start_date
    }

    pub fn return_date(&self) -> Option<Date> {
        self.return_date
    }

    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Days from checkout to return; `None` while the loan is open
    pub fn duration(&self) -> Option<i64> {
        self.return_date.map(|returned| returned - self.start_date)
    }

    pub fn key(&self) -> LoanKey {
        LoanKey::new(&self.book_uid, &self.member_uid)
    }

    pub(crate) fn close(&mut self, return_date: Date) {
        self.return_date = Some(return_date);
    }
}

/// Wire codec for `return_date`: day-count 0 means the loan is open.
mod open_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::value_objects::Date;

    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.map(|date| date.day_count()).unwrap_or(0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match i64::deserialize(deserializer)? {
            0 => Ok(None),
            days => Ok(Some(Date::from_day_count(days))),
        }
    }
}
