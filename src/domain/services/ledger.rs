//! LoanLedger - append-ordered loan history per book/member pair
//!
//! The ledger is the source of truth for who holds what: a book is on
//! loan exactly when some key holds an open record for it.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{LoanKey, LoanRecord, Record};
use crate::domain::ports::{Snapshot, SnapshotStore, SnapshotValue};
use crate::domain::services::corrupt_snapshot;
use crate::domain::value_objects::Date;
use crate::error::{CirculationError, CirculationResult};

/// Full lending history, grouped by composite key
pub struct LoanLedger {
    name: String,
    loans: BTreeMap<LoanKey, Vec<LoanRecord>>,
    store: Arc<dyn SnapshotStore>,
}

impl LoanLedger {
    pub fn new(name: impl Into<String>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            name: name.into(),
            loans: BTreeMap::new(),
            store,
        }
    }

    /// Record a checkout
    ///
    /// Guards globally: a book with an open record under any key cannot
    /// be lent again, whoever is asking.
    pub fn open_loan(
        &mut self,
        book_uid: &str,
        member_uid: &str,
        date: Date,
    ) -> CirculationResult<()> {
        if self.is_on_loan(book_uid) {
            return Err(CirculationError::AlreadyOnLoan {
                book_uid: book_uid.to_string(),
            });
        }
        let record = LoanRecord::new(book_uid, member_uid, date);
        self.loans.entry(record.key()).or_default().push(record);
        Ok(())
    }

    /// Record a return, giving back the loan duration in whole days
    pub fn close_loan(
        &mut self,
        book_uid: &str,
        member_uid: &str,
        date: Date,
    ) -> CirculationResult<i64> {
        let key = LoanKey::new(book_uid, member_uid);
        let open = self
            .loans
            .get_mut(&key)
            .and_then(|records| records.iter_mut().find(|record| record.is_open()))
            .ok_or_else(|| CirculationError::NoOpenLoan {
                book_uid: book_uid.to_string(),
                member_uid: member_uid.to_string(),
            })?;
        open.close(date);
        Ok(date - open.start_date())
    }

    /// Whether some member currently holds this book
    pub fn is_on_loan(&self, book_uid: &str) -> bool {
        self.open_record(book_uid).is_some()
    }

    /// Uid of the member holding this book, if anyone does
    pub fn current_holder(&self, book_uid: &str) -> Option<&str> {
        self.open_record(book_uid).map(LoanRecord::member_uid)
    }

    /// Open records held by one member, in key order
    pub fn active_loans_of(&self, member_uid: &str) -> Vec<&LoanRecord> {
        self.loans
            .iter()
            .filter(|(key, _)| key.member_uid() == member_uid)
            .flat_map(|(_, records)| records.iter())
            .filter(|record| record.is_open())
            .collect()
    }

    /// Every lending of this book to this member, oldest first
    pub fn history(&self, book_uid: &str, member_uid: &str) -> &[LoanRecord] {
        self.loans
            .get(&LoanKey::new(book_uid, member_uid))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn open_record(&self, book_uid: &str) -> Option<&LoanRecord> {
        self.loans
            .iter()
            .filter(|(key, _)| key.book_uid() == book_uid)
            .flat_map(|(_, records)| records.iter())
            .find(|record| record.is_open())
    }

    /// Persist the ledger, one entry per key
    pub fn save(&self) -> CirculationResult<()> {
        let mut snapshot = Snapshot::new();
        for (key, records) in &self.loans {
            let sequence = records
                .iter()
                .map(|record| Record::Loan(record.clone()))
                .collect();
            snapshot.push(key.to_string(), SnapshotValue::Sequence(sequence));
        }
        self.store.save(&self.name, &snapshot)?;
        Ok(())
    }

    /// Rebuild from the stored snapshot
    ///
    /// Records regroup by their own book/member fields, never by parsing
    /// the entry label, so uids containing the label separator are safe.
    /// On any failure the current state is left untouched.
    pub fn restore(&mut self) -> CirculationResult<()> {
        let snapshot = self.store.restore(&self.name)?;
        let mut loans: BTreeMap<LoanKey, Vec<LoanRecord>> = BTreeMap::new();
        for (entry_name, value) in snapshot.iter() {
            let records = match value {
                SnapshotValue::Sequence(records) => records,
                SnapshotValue::Subscribers(subscribers) if subscribers.is_empty() => continue,
                _ => {
                    return Err(corrupt_snapshot(
                        &self.name,
                        format!("entry '{entry_name}' is not a loan sequence"),
                    ))
                }
            };
            for record in records {
                match record {
                    Record::Loan(loan) => {
                        loans.entry(loan.key()).or_default().push(loan.clone());
                    }
                    other => {
                        return Err(corrupt_snapshot(
                            &self.name,
                            format!("entry '{entry_name}' holds a {} record", other.kind()),
                        ))
                    }
                }
            }
        }
        self.loans = loans;
        Ok(())
    }
}
