//! Lending Engine
//!
//! Coordinates the circulation flow:
//! 1. Look up the entities involved
//! 2. Enforce policy (fine blocks, loan limits, queue order)
//! 3. Apply the change to the ledger, the queues, and the entity stores
//! 4. Publish notices for anything members should hear about
//! 5. Save a snapshot of every component that changed
//!
//! Rule violations fail the operation. Snapshot saves never do: a
//! failed save becomes a warning on the outcome and the in-memory
//! state stays authoritative.

use std::sync::Arc;

use crate::domain::entities::{Book, BookStatus, Entity, Member};
use crate::domain::ports::{Notice, RecordSource, SnapshotStore, StoreError};
use crate::domain::services::{
    EntityStore, LoanLedger, NotificationHub, PublishOutcome, ReservationQueue,
};
use crate::domain::value_objects::Date;
use crate::error::{CirculationError, CirculationResult};

use super::outcome::{
    CardIssueOutcome, CheckoutSummary, DeclineReason, DeclinedItem, EnrollmentOutcome, IssuedCard,
    PaymentOutcome, ReservationOutcome, ReturnOutcome, SeedOutcome,
};
use super::policy::LendingPolicy;

/// Event carrying fine notices to members with books out
pub const LOANS_EVENT: &str = "Loans";
/// Event telling reservers their book is ready for collection
pub const RESERVATIONS_EVENT: &str = "Reservations";
/// Event telling members their card is ready for collection
pub const NEW_CARDS_EVENT: &str = "NewCards";

/// Facade over the circulation components
///
/// Owns one entity store per kind, the loan ledger, the reservation
/// queues, and the notification hub, all snapshotting through a single
/// shared store.
pub struct LendingEngine {
    books: EntityStore<Book>,
    members: EntityStore<Member>,
    ledger: LoanLedger,
    reservations: ReservationQueue,
    hub: NotificationHub,
    policy: LendingPolicy,
}

impl LendingEngine {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_policy(store, LendingPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn SnapshotStore>, policy: LendingPolicy) -> Self {
        let mut hub = NotificationHub::new("events", store.clone());
        hub.declare_event(LOANS_EVENT);
        hub.declare_event(RESERVATIONS_EVENT);
        hub.declare_event(NEW_CARDS_EVENT);
        Self {
            books: EntityStore::new("books", store.clone()),
            members: EntityStore::new("members", store.clone()),
            ledger: LoanLedger::new("loans", store.clone()),
            reservations: ReservationQueue::new("reservations", store),
            hub,
            policy,
        }
    }

    // --- Read access ---

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn books(&self) -> &EntityStore<Book> {
        &self.books
    }

    pub fn members(&self) -> &EntityStore<Member> {
        &self.members
    }

    pub fn ledger(&self) -> &LoanLedger {
        &self.ledger
    }

    pub fn reservations(&self) -> &ReservationQueue {
        &self.reservations
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    // --- Circulation ---

    /// Lend a batch of books to one member
    ///
    /// The member must exist, owe nothing, and every requested uid must
    /// resolve before any loan opens. Books another member holds or has
    /// reserved are declined, not lent; with `reserve_on_decline` set, a
    /// decline on a reserved book queues the member for it. Hitting the
    /// loan limit halts the batch; loans already opened in it stand.
    pub fn checkout(
        &mut self,
        member_uid: &str,
        book_uids: &[&str],
        date: Date,
    ) -> CirculationResult<CheckoutSummary> {
        let member = self.members.get(member_uid)?;
        if member.has_fine() {
            return Err(CirculationError::OutstandingFine {
                member_uid: member_uid.to_string(),
                amount: member.fines(),
            });
        }
        for book_uid in book_uids {
            self.books.get(book_uid)?;
        }

        let mut summary = CheckoutSummary::new(member_uid);
        for &book_uid in book_uids {
            if self.members.get(member_uid)?.loan_count() >= self.policy.max_loans {
                summary.halted = Some(CirculationError::MaxLoansExceeded {
                    member_uid: member_uid.to_string(),
                    limit: self.policy.max_loans,
                });
                break;
            }
            match self.books.get(book_uid)?.status() {
                BookStatus::Available => {
                    self.lend(book_uid, member_uid, date)?;
                    summary.loaned.push(book_uid.to_string());
                }
                BookStatus::OnLoan => {
                    let holder = self
                        .ledger
                        .current_holder(book_uid)
                        .unwrap_or("unknown")
                        .to_string();
                    summary.declined.push(DeclinedItem {
                        book_uid: book_uid.to_string(),
                        reason: DeclineReason::OnLoanTo { member_uid: holder },
                    });
                }
                BookStatus::Reserved => {
                    let front = self
                        .reservations
                        .front(book_uid)
                        .ok()
                        .map(|record| record.member_uid().to_string());
                    match front.as_deref() {
                        Some(front) if front == member_uid => {
                            self.reservations.cancel(book_uid, member_uid)?;
                            self.lend(book_uid, member_uid, date)?;
                            summary.loaned.push(book_uid.to_string());
                        }
                        Some(_) => {
                            let position = if self.policy.reserve_on_decline {
                                let position =
                                    self.reservations.reserve(book_uid, member_uid, date);
                                self.hub.subscribe(RESERVATIONS_EVENT, member_uid)?;
                                Some(position)
                            } else {
                                self.reservations.position_of(book_uid, member_uid)
                            };
                            summary.declined.push(DeclinedItem {
                                book_uid: book_uid.to_string(),
                                reason: DeclineReason::ReservedByAnother { position },
                            });
                        }
                        // marked reserved but nobody queued: lend it
                        None => {
                            self.lend(book_uid, member_uid, date)?;
                            summary.loaned.push(book_uid.to_string());
                        }
                    }
                }
            }
        }

        self.persist_lending_state(&mut summary.warnings);
        tracing::info!(
            member = %member_uid,
            loaned = summary.loaned.len(),
            declined = summary.declined.len(),
            halted = summary.halted.is_some(),
            "checkout processed"
        );
        Ok(summary)
    }

    /// Take a book back from whoever holds it
    ///
    /// Closes the loan, assesses any overdue fine, and either holds
    /// the book for the front of its reservation queue or shelves it.
    pub fn return_book(&mut self, book_uid: &str, date: Date) -> CirculationResult<ReturnOutcome> {
        self.books.get(book_uid)?;
        let member_uid = self
            .ledger
            .current_holder(book_uid)
            .ok_or_else(|| CirculationError::NotOnLoan {
                book_uid: book_uid.to_string(),
            })?
            .to_string();
        let duration_days = self.ledger.close_loan(book_uid, &member_uid, date)?;
        let mut warnings = Vec::new();

        let fine = self.policy.fine_for(duration_days);
        if let Some(amount) = fine {
            self.members.get_mut(&member_uid)?.add_fine(amount);
            let notice = Notice::FineAssessed {
                member_uid: member_uid.clone(),
                book_uid: book_uid.to_string(),
                amount,
            };
            let delivery = self.hub.publish(LOANS_EVENT, &notice, &self.members);
            note_delivery_failures(&mut warnings, delivery);
        }

        let member = self.members.get_mut(&member_uid)?;
        member.decrement_loans();
        if member.loan_count() == 0 {
            self.hub.unsubscribe(LOANS_EVENT, &member_uid)?;
        }

        let notified_reserver = match self.reservations.front(book_uid) {
            Ok(front) => Some(front.member_uid().to_string()),
            Err(_) => None,
        };
        match &notified_reserver {
            Some(next_member) => {
                self.books.get_mut(book_uid)?.set_reserved();
                let notice = Notice::ReservationReady {
                    member_uid: next_member.clone(),
                    book_uid: book_uid.to_string(),
                };
                let delivery = self.hub.publish(RESERVATIONS_EVENT, &notice, &self.members);
                note_delivery_failures(&mut warnings, delivery);
            }
            None => self.books.get_mut(book_uid)?.set_available(),
        }

        let mut outcome = ReturnOutcome {
            book_uid: book_uid.to_string(),
            member_uid,
            duration_days,
            fine,
            next_status: self.books.get(book_uid)?.status(),
            notified_reserver,
            warnings,
        };
        self.persist_lending_state(&mut outcome.warnings);
        tracing::info!(
            book = %outcome.book_uid,
            member = %outcome.member_uid,
            days = outcome.duration_days,
            fine = outcome.fine.unwrap_or(0.0),
            "book returned"
        );
        Ok(outcome)
    }

    /// Queue a member for a book
    ///
    /// Reserving twice keeps the original place and date. A book on
    /// the shelf is marked reserved immediately so nobody walks off
    /// with it before the reserver arrives.
    pub fn reserve(
        &mut self,
        member_uid: &str,
        book_uid: &str,
        date: Date,
    ) -> CirculationResult<ReservationOutcome> {
        self.books.get(book_uid)?;
        let mut enrolled = false;
        match self.members.find(member_uid) {
            Some(_) => {}
            None if self.policy.auto_enroll_reservers => {
                self.members
                    .add(Member::new(member_uid, "", "", "", ""))?;
                enrolled = true;
                tracing::info!(member = %member_uid, "auto-enrolled for reservation");
            }
            None => {
                return Err(CirculationError::NotFound {
                    kind: Member::KIND,
                    uid: member_uid.to_string(),
                });
            }
        }

        let position = self.reservations.reserve(book_uid, member_uid, date);
        let on_loan = self.ledger.is_on_loan(book_uid);
        if !on_loan {
            self.books.get_mut(book_uid)?.set_reserved();
        }
        self.hub.subscribe(RESERVATIONS_EVENT, member_uid)?;

        let mut outcome = ReservationOutcome {
            book_uid: book_uid.to_string(),
            member_uid: member_uid.to_string(),
            position,
            available_now: !on_loan && position == 0,
            enrolled,
            warnings: Vec::new(),
        };
        note_save_failure(
            &mut outcome.warnings,
            "reservations",
            self.reservations.save(),
        );
        note_save_failure(&mut outcome.warnings, "books", self.books.save());
        note_save_failure(&mut outcome.warnings, "events", self.hub.save());
        if enrolled {
            note_save_failure(&mut outcome.warnings, "members", self.members.save());
        }
        tracing::info!(
            member = %member_uid,
            book = %book_uid,
            position = outcome.position,
            "reservation recorded"
        );
        Ok(outcome)
    }

    // --- Membership desk ---

    /// Enrol a new member and allocate their uid
    pub fn enroll_member(
        &mut self,
        first_name: &str,
        last_name: &str,
        gender: &str,
        email: &str,
    ) -> CirculationResult<EnrollmentOutcome> {
        let member_uid = self.members.next_uid();
        self.members.add(Member::new(
            &member_uid,
            first_name,
            last_name,
            gender,
            email,
        ))?;
        let mut outcome = EnrollmentOutcome {
            member_uid,
            warnings: Vec::new(),
        };
        note_save_failure(&mut outcome.warnings, "members", self.members.save());
        tracing::info!(member = %outcome.member_uid, "member enrolled");
        Ok(outcome)
    }

    /// Members enrolled but not yet holding a card
    pub fn members_awaiting_card(&self) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|member| member.awaiting_card())
            .collect()
    }

    /// Print a card for every member still waiting for one
    pub fn issue_cards(&mut self) -> CirculationResult<CardIssueOutcome> {
        let awaiting: Vec<String> = self
            .members
            .iter()
            .filter(|member| member.awaiting_card())
            .map(|member| member.uid().to_string())
            .collect();

        let mut outcome = CardIssueOutcome::default();
        for member_uid in awaiting {
            let card_number = self.issue_card_to(&member_uid, &mut outcome.warnings)?;
            outcome.issued.push(IssuedCard {
                member_uid,
                card_number,
            });
        }
        note_save_failure(&mut outcome.warnings, "members", self.members.save());
        note_save_failure(&mut outcome.warnings, "events", self.hub.save());
        tracing::info!(issued = outcome.issued.len(), "card issuing run finished");
        Ok(outcome)
    }

    /// Replace one member's card, bumping its issue number
    pub fn reissue_card(&mut self, member_uid: &str) -> CirculationResult<CardIssueOutcome> {
        self.members.get(member_uid)?;
        let mut outcome = CardIssueOutcome::default();
        let card_number = self.issue_card_to(member_uid, &mut outcome.warnings)?;
        outcome.issued.push(IssuedCard {
            member_uid: member_uid.to_string(),
            card_number,
        });
        note_save_failure(&mut outcome.warnings, "members", self.members.save());
        note_save_failure(&mut outcome.warnings, "events", self.hub.save());
        Ok(outcome)
    }

    /// Pay down a member's fine balance
    pub fn record_payment(
        &mut self,
        member_uid: &str,
        amount: f64,
    ) -> CirculationResult<PaymentOutcome> {
        let remaining = self.members.get_mut(member_uid)?.record_payment(amount);
        let mut outcome = PaymentOutcome {
            member_uid: member_uid.to_string(),
            remaining,
            warnings: Vec::new(),
        };
        note_save_failure(&mut outcome.warnings, "members", self.members.save());
        tracing::info!(member = %member_uid, remaining, "payment recorded");
        Ok(outcome)
    }

    // --- Seeding and recovery ---

    /// Load books from a record source into the catalogue
    pub fn seed_books(&mut self, source: &mut dyn RecordSource) -> CirculationResult<SeedOutcome> {
        let added = self.books.seed(source)?;
        let mut outcome = SeedOutcome {
            added,
            warnings: Vec::new(),
        };
        note_save_failure(&mut outcome.warnings, "books", self.books.save());
        tracing::info!(added, "book catalogue seeded");
        Ok(outcome)
    }

    /// Load members from a record source into the register
    pub fn seed_members(
        &mut self,
        source: &mut dyn RecordSource,
    ) -> CirculationResult<SeedOutcome> {
        let added = self.members.seed(source)?;
        let mut outcome = SeedOutcome {
            added,
            warnings: Vec::new(),
        };
        note_save_failure(&mut outcome.warnings, "members", self.members.save());
        tracing::info!(added, "member register seeded");
        Ok(outcome)
    }

    /// Reload every component from its snapshot
    ///
    /// Components restore independently. A missing snapshot leaves
    /// that component as it was; a corrupt one does too, and is
    /// reported in the returned warnings.
    pub fn restore_all(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        note_restore_failure(&mut warnings, "books", self.books.restore());
        note_restore_failure(&mut warnings, "members", self.members.restore());
        note_restore_failure(&mut warnings, "loans", self.ledger.restore());
        note_restore_failure(&mut warnings, "reservations", self.reservations.restore());
        note_restore_failure(&mut warnings, "events", self.hub.restore());
        // older snapshots may predate an event name
        self.hub.declare_event(LOANS_EVENT);
        self.hub.declare_event(RESERVATIONS_EVENT);
        self.hub.declare_event(NEW_CARDS_EVENT);
        warnings
    }

    // --- Internals ---

    /// Open a loan and update everything that tracks it
    fn lend(&mut self, book_uid: &str, member_uid: &str, date: Date) -> CirculationResult<()> {
        self.ledger.open_loan(book_uid, member_uid, date)?;
        self.books.get_mut(book_uid)?.set_on_loan();
        self.members.get_mut(member_uid)?.increment_loans();
        self.hub.subscribe(LOANS_EVENT, member_uid)?;
        Ok(())
    }

    /// Card numbers run `<member uid>-<issue>`, starting at issue 1
    fn issue_card_to(
        &mut self,
        member_uid: &str,
        warnings: &mut Vec<String>,
    ) -> CirculationResult<String> {
        let member = self.members.get_mut(member_uid)?;
        let issue = next_card_issue(member_uid, member.card_number());
        let card_number = format!("{member_uid}-{issue}");
        member.set_card_number(&card_number);

        self.hub.subscribe(NEW_CARDS_EVENT, member_uid)?;
        let notice = Notice::CardReady {
            member_uid: member_uid.to_string(),
            card_number: card_number.clone(),
        };
        let delivery = self.hub.publish(NEW_CARDS_EVENT, &notice, &self.members);
        note_delivery_failures(warnings, delivery);
        tracing::info!(member = %member_uid, card = %card_number, "card issued");
        Ok(card_number)
    }

    fn persist_lending_state(&self, warnings: &mut Vec<String>) {
        note_save_failure(warnings, "loans", self.ledger.save());
        note_save_failure(warnings, "members", self.members.save());
        note_save_failure(warnings, "books", self.books.save());
        note_save_failure(warnings, "reservations", self.reservations.save());
        note_save_failure(warnings, "events", self.hub.save());
    }
}

fn next_card_issue(member_uid: &str, current_card: &str) -> u32 {
    current_card
        .strip_prefix(&format!("{member_uid}-"))
        .and_then(|issue| issue.parse::<u32>().ok())
        .map(|issue| issue + 1)
        .unwrap_or(1)
}

fn note_save_failure(warnings: &mut Vec<String>, snapshot: &str, result: CirculationResult<()>) {
    if let Err(err) = result {
        tracing::warn!(snapshot, error = %err, "snapshot save failed");
        warnings.push(format!("failed to save {snapshot}: {err}"));
    }
}

fn note_restore_failure(warnings: &mut Vec<String>, snapshot: &str, result: CirculationResult<()>) {
    match result {
        Ok(()) => {}
        // nothing saved yet on a fresh store
        Err(CirculationError::Store(StoreError::NotFound { .. })) => {
            tracing::debug!(snapshot, "no snapshot to restore");
        }
        Err(err) => {
            tracing::warn!(snapshot, error = %err, "restore failed, keeping current state");
            warnings.push(format!("could not restore {snapshot}: {err}"));
        }
    }
}

fn note_delivery_failures(warnings: &mut Vec<String>, outcome: PublishOutcome) {
    for (uid, err) in outcome.failed {
        tracing::warn!(member = %uid, error = %err, "notice delivery failed");
        warnings.push(format!("notice to '{uid}' failed: {err}"));
    }
}
