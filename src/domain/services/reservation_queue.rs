//! ReservationQueue - FIFO waiting lists per book
//!
//! A book has a queue only while someone is waiting; cancelling the last
//! entry drops the book's key entirely.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{Record, ReservationRecord};
use crate::domain::ports::{Snapshot, SnapshotStore, SnapshotValue};
use crate::domain::services::corrupt_snapshot;
use crate::domain::value_objects::Date;
use crate::error::{CirculationError, CirculationResult};

/// Per-book FIFO reservation queues
pub struct ReservationQueue {
    name: String,
    queues: BTreeMap<String, Vec<ReservationRecord>>,
    store: Arc<dyn SnapshotStore>,
}

impl ReservationQueue {
    pub fn new(name: impl Into<String>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            name: name.into(),
            queues: BTreeMap::new(),
            store,
        }
    }

    /// Join the queue for a book, returning the member's position
    ///
    /// Idempotent: a member already waiting keeps their place and the
    /// original reservation date.
    pub fn reserve(&mut self, book_uid: &str, member_uid: &str, date: Date) -> usize {
        if let Some(position) = self.position_of(book_uid, member_uid) {
            return position;
        }
        let queue = self.queues.entry(book_uid.to_string()).or_default();
        queue.push(ReservationRecord::new(book_uid, member_uid, date));
        queue.len() - 1
    }

    /// Leave the queue for a book
    pub fn cancel(&mut self, book_uid: &str, member_uid: &str) -> CirculationResult<()> {
        let not_queued = || CirculationError::NotFound {
            kind: "reservation",
            uid: member_uid.to_string(),
        };
        let queue = self.queues.get_mut(book_uid).ok_or_else(not_queued)?;
        let index = queue
            .iter()
            .position(|record| record.member_uid() == member_uid)
            .ok_or_else(not_queued)?;
        queue.remove(index);
        if queue.is_empty() {
            self.queues.remove(book_uid);
        }
        Ok(())
    }

    /// The member next entitled to the book
    pub fn front(&self, book_uid: &str) -> CirculationResult<&ReservationRecord> {
        self.queues
            .get(book_uid)
            .and_then(|queue| queue.first())
            .ok_or_else(|| CirculationError::EmptyQueue {
                book_uid: book_uid.to_string(),
            })
    }

    /// A member's place in a book's queue; 0 is the front
    pub fn position_of(&self, book_uid: &str, member_uid: &str) -> Option<usize> {
        self.queues
            .get(book_uid)?
            .iter()
            .position(|record| record.member_uid() == member_uid)
    }

    /// Whether anyone is waiting for this book
    pub fn has_queue(&self, book_uid: &str) -> bool {
        self.queues.contains_key(book_uid)
    }

    pub fn queue_len(&self, book_uid: &str) -> usize {
        self.queues.get(book_uid).map(Vec::len).unwrap_or(0)
    }

    /// Persist every queue, one entry per book
    pub fn save(&self) -> CirculationResult<()> {
        let mut snapshot = Snapshot::new();
        for (book_uid, records) in &self.queues {
            let sequence = records
                .iter()
                .map(|record| Record::Reservation(record.clone()))
                .collect();
            snapshot.push(book_uid.clone(), SnapshotValue::Sequence(sequence));
        }
        self.store.save(&self.name, &snapshot)?;
        Ok(())
    }

    /// Rebuild from the stored snapshot; queue order is record order
    ///
    /// On any failure the current state is left untouched.
    pub fn restore(&mut self) -> CirculationResult<()> {
        let snapshot = self.store.restore(&self.name)?;
        let mut queues: BTreeMap<String, Vec<ReservationRecord>> = BTreeMap::new();
        for (entry_name, value) in snapshot.iter() {
            let records = match value {
                SnapshotValue::Sequence(records) => records,
                SnapshotValue::Subscribers(subscribers) if subscribers.is_empty() => continue,
                _ => {
                    return Err(corrupt_snapshot(
                        &self.name,
                        format!("entry '{entry_name}' is not a reservation sequence"),
                    ))
                }
            };
            for record in records {
                match record {
                    Record::Reservation(reservation) => {
                        queues
                            .entry(reservation.book_uid().to_string())
                            .or_default()
                            .push(reservation.clone());
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
        self.queues = queues;
        Ok(())
    }
}
