//! Tagged record union - the unit of snapshot serialization
//!
//! Every persisted value is a record carrying a `"record"` discriminant
//! field, so deserialization dispatches on the tag instead of sniffing
//! key names.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Book, LoanRecord, Member, ReservationRecord};

/// Any record the snapshot format can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    Book(Book),
    Member(Member),
    Loan(LoanRecord),
    Reservation(ReservationRecord),
}

impl Record {
    /// The discriminant tag as written to the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Book(_) => "book",
            Record::Member(_) => "member",
            Record::Loan(_) => "loan",
            Record::Reservation(_) => "reservation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Date;

    #[test]
    fn book_record_wire_format() {
        let record = Record::Book(Book::new("1", "Dune", "Frank Herbert", "Sci-fi"));
        let json = serde_json::to_string(&record).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"record":"book","uid":"1","title":"Dune","author":"Frank Herbert","genre":"Sci-fi","status":"Available"}"#
        );
    }

    #[test]
    fn loan_record_wire_format_uses_the_open_sentinel() {
        let record = Record::Loan(LoanRecord::new("1", "4", Date::from_day_count(100)));
        let json = serde_json::to_string(&record).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"record":"loan","book_uid":"1","member_uid":"4","start_date":100,"return_date":0}"#
        );
    }

    #[test]
    fn tag_dispatch_round_trips_every_kind() {
        let records = vec![
            Record::Book(Book::new("1", "Dune", "Frank Herbert", "Sci-fi")),
            Record::Member(Member::new("4", "Mary", "Shelley", "F", "mary@example.org")),
            Record::Loan(LoanRecord::new("1", "4", Date::from_day_count(100))),
            Record::Reservation(ReservationRecord::new("1", "5", Date::from_day_count(101))),
        ];
        for record in records {
            let json = serde_json::to_string(&record).unwrap();
            let back: Record = serde_json::from_str(&json).unwrap();
            assert_eq!(back.kind(), record.kind());
            assert_eq!(back, record);
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let result: Result<Record, _> =
            serde_json::from_str(r#"{"record":"magazine","uid":"9"}"#);
        assert!(result.is_err());
    }
}
