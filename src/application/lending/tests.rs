//! Lending Engine Tests

use super::*;
use crate::domain::entities::BookStatus;
use crate::domain::ports::{
    FieldMap, RecordSource, Snapshot, SnapshotStore, StoreError, StoreResult,
};
use crate::domain::value_objects::Date;
use crate::error::CirculationError;
use crate::infrastructure::stores::InMemoryStore;
use std::sync::Arc;

const ALICE: &str = "1";
const BEN: &str = "2";

fn day(n: i64) -> Date {
    Date::from_day_count(n)
}

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

// Canned record source for seeding the catalogue

struct FixtureSource {
    remaining: Vec<FieldMap>,
}

impl FixtureSource {
    fn new(records: Vec<FieldMap>) -> Self {
        let mut remaining = records;
        remaining.reverse();
        Self { remaining }
    }
}

impl RecordSource for FixtureSource {
    fn next_record(&mut self) -> anyhow::Result<Option<FieldMap>> {
        Ok(self.remaining.pop())
    }
}

fn catalogue() -> FixtureSource {
    FixtureSource::new(vec![
        fields(&[
            ("uid", "1"),
            ("title", "Dune"),
            ("author", "Frank Herbert"),
            ("genre", "Sci-fi"),
        ]),
        fields(&[
            ("uid", "2"),
            ("title", "Emma"),
            ("author", "Jane Austen"),
            ("genre", "Classic"),
        ]),
        fields(&[
            ("uid", "3"),
            ("title", "Dracula"),
            ("author", "Bram Stoker"),
            ("genre", "Horror"),
        ]),
    ])
}

/// Three books on the shelf, Alice and Ben enrolled
fn seeded_on(store: Arc<dyn SnapshotStore>, policy: LendingPolicy) -> LendingEngine {
    let mut engine = LendingEngine::with_policy(store, policy);
    engine.seed_books(&mut catalogue()).unwrap();
    engine
        .enroll_member("Alice", "Nilsen", "female", "alice@example.com")
        .unwrap();
    engine
        .enroll_member("Ben", "Okafor", "male", "ben@example.com")
        .unwrap();
    engine
}

fn seeded() -> LendingEngine {
    seeded_on(Arc::new(InMemoryStore::new()), LendingPolicy::default())
}

#[test]
fn checkout_lends_available_books() {
    let mut engine = seeded();
    let summary = engine.checkout(ALICE, &["1", "3"], day(100)).unwrap();

    assert!(summary.all_loaned());
    assert_eq!(summary.loaned, vec!["1", "3"]);
    assert_eq!(engine.books().get("1").unwrap().status(), BookStatus::OnLoan);
    assert_eq!(engine.ledger().current_holder("3"), Some(ALICE));
    assert_eq!(engine.members().get(ALICE).unwrap().loan_count(), 2);
    assert_eq!(engine.hub().subscribers(LOANS_EVENT), &[ALICE.to_string()]);
}

#[test]
fn checkout_requires_an_enrolled_member() {
    let mut engine = seeded();
    let err = engine.checkout("99", &["1"], day(100)).unwrap_err();
    assert!(matches!(err, CirculationError::NotFound { kind: "member", .. }));
}

#[test]
fn unknown_book_fails_the_batch_before_any_loan_opens() {
    let mut engine = seeded();
    let err = engine.checkout(ALICE, &["1", "99"], day(100)).unwrap_err();

    assert!(matches!(err, CirculationError::NotFound { kind: "book", .. }));
    assert_eq!(
        engine.books().get("1").unwrap().status(),
        BookStatus::Available
    );
    assert!(!engine.ledger().is_on_loan("1"));
}

#[test]
fn loan_limit_halts_the_batch_but_earlier_loans_stand() {
    let policy = LendingPolicy::default().with_max_loans(2);
    let mut engine = seeded_on(Arc::new(InMemoryStore::new()), policy);

    let summary = engine.checkout(ALICE, &["1", "2", "3"], day(100)).unwrap();

    assert_eq!(summary.loaned, vec!["1", "2"]);
    assert!(matches!(
        summary.halted,
        Some(CirculationError::MaxLoansExceeded { limit: 2, .. })
    ));
    assert_eq!(
        engine.books().get("3").unwrap().status(),
        BookStatus::Available
    );
    assert_eq!(engine.members().get(ALICE).unwrap().loan_count(), 2);
}

#[test]
fn checkout_declines_a_book_another_member_holds() {
    let mut engine = seeded();
    engine.checkout(ALICE, &["1"], day(100)).unwrap();

    let summary = engine.checkout(BEN, &["1", "2"], day(101)).unwrap();

    assert_eq!(summary.loaned, vec!["2"]);
    assert_eq!(summary.declined.len(), 1);
    assert_eq!(summary.declined[0].book_uid, "1");
    assert_eq!(
        summary.declined[0].reason,
        DeclineReason::OnLoanTo {
            member_uid: ALICE.to_string()
        }
    );
}

#[test]
fn reserved_book_lends_only_to_the_front_of_its_queue() {
    let mut engine = seeded();
    engine.reserve(BEN, "2", day(100)).unwrap();

    let blocked = engine.checkout(ALICE, &["2"], day(101)).unwrap();
    assert!(blocked.loaned.is_empty());
    assert_eq!(
        blocked.declined[0].reason,
        DeclineReason::ReservedByAnother { position: None }
    );
    assert_eq!(
        engine.books().get("2").unwrap().status(),
        BookStatus::Reserved
    );

    let front = engine.checkout(BEN, &["2"], day(101)).unwrap();
    assert_eq!(front.loaned, vec!["2"]);
    assert!(!engine.reservations().has_queue("2"));
    assert_eq!(engine.books().get("2").unwrap().status(), BookStatus::OnLoan);
}

#[test]
fn a_declined_checkout_can_join_the_queue_when_the_policy_opts_in() {
    let policy = LendingPolicy::default().with_reserve_on_decline(true);
    let mut engine = seeded_on(Arc::new(InMemoryStore::new()), policy);
    engine.reserve(BEN, "2", day(100)).unwrap();

    let summary = engine.checkout(ALICE, &["2"], day(101)).unwrap();

    assert!(summary.loaned.is_empty());
    assert_eq!(
        summary.declined[0].reason,
        DeclineReason::ReservedByAnother { position: Some(1) }
    );
    assert_eq!(engine.reservations().queue_len("2"), 2);
    assert_eq!(engine.reservations().position_of("2", ALICE), Some(1));
    assert!(engine
        .hub()
        .subscribers(RESERVATIONS_EVENT)
        .contains(&ALICE.to_string()));
}

#[test]
fn return_shelves_a_book_nobody_reserved() {
    let mut engine = seeded();
    engine.checkout(ALICE, &["1"], day(100)).unwrap();

    let outcome = engine.return_book("1", day(114)).unwrap();

    assert_eq!(outcome.member_uid, ALICE);
    assert_eq!(outcome.duration_days, 14);
    assert_eq!(outcome.fine, None);
    assert!(!outcome.was_overdue());
    assert_eq!(outcome.next_status, BookStatus::Available);
    assert_eq!(outcome.notified_reserver, None);
    assert_eq!(engine.members().get(ALICE).unwrap().loan_count(), 0);
    assert!(engine.hub().subscribers(LOANS_EVENT).is_empty());
}

#[test]
fn returning_a_book_not_on_loan_errs() {
    let mut engine = seeded();
    let err = engine.return_book("1", day(100)).unwrap_err();
    assert!(matches!(err, CirculationError::NotOnLoan { .. }));
}

#[test]
fn late_return_fines_the_member_and_blocks_further_loans() {
    let mut engine = seeded();
    engine.checkout(ALICE, &["1"], day(100)).unwrap();

    let outcome = engine.return_book("1", day(120)).unwrap();
    assert_eq!(outcome.duration_days, 20);
    assert_eq!(outcome.fine, Some(6.0));

    let err = engine.checkout(ALICE, &["2"], day(120)).unwrap_err();
    assert!(matches!(
        err,
        CirculationError::OutstandingFine { amount, .. } if amount == 6.0
    ));

    let payment = engine.record_payment(ALICE, 6.0).unwrap();
    assert!(payment.settled());
    let summary = engine.checkout(ALICE, &["2"], day(120)).unwrap();
    assert_eq!(summary.loaned, vec!["2"]);
}

#[test]
fn return_holds_the_book_for_the_next_reserver() {
    let mut engine = seeded();
    engine.checkout(ALICE, &["1"], day(100)).unwrap();
    engine.reserve(BEN, "1", day(101)).unwrap();

    let outcome = engine.return_book("1", day(105)).unwrap();

    assert_eq!(outcome.next_status, BookStatus::Reserved);
    assert_eq!(outcome.notified_reserver, Some(BEN.to_string()));
    assert_eq!(engine.reservations().queue_len("1"), 1);
}

#[test]
fn reserving_a_shelved_book_marks_it_reserved() {
    let mut engine = seeded();
    let outcome = engine.reserve(BEN, "2", day(100)).unwrap();

    assert_eq!(outcome.position, 0);
    assert!(outcome.available_now);
    assert!(!outcome.enrolled);
    assert_eq!(
        engine.books().get("2").unwrap().status(),
        BookStatus::Reserved
    );
    assert_eq!(engine.hub().subscribers(RESERVATIONS_EVENT), &[BEN.to_string()]);
}

#[test]
fn reserving_twice_keeps_the_original_place() {
    let mut engine = seeded();
    engine.checkout(ALICE, &["1"], day(100)).unwrap();
    engine.reserve(BEN, "1", day(101)).unwrap();

    let again = engine.reserve(BEN, "1", day(200)).unwrap();

    assert_eq!(again.position, 0);
    assert!(!again.available_now);
    assert_eq!(engine.reservations().queue_len("1"), 1);
    assert_eq!(
        engine.reservations().front("1").unwrap().date_made(),
        day(101)
    );
}

#[test]
fn reserving_needs_enrollment_unless_the_policy_allows_walk_ins() {
    let mut engine = seeded();
    let err = engine.reserve("99", "1", day(100)).unwrap_err();
    assert!(matches!(err, CirculationError::NotFound { kind: "member", .. }));

    let policy = LendingPolicy::default().with_auto_enroll_reservers(true);
    let mut walk_in = seeded_on(Arc::new(InMemoryStore::new()), policy);
    let outcome = walk_in.reserve("99", "1", day(100)).unwrap();

    assert!(outcome.enrolled);
    assert!(walk_in.members().find("99").is_some());
}

#[test]
fn enrolled_members_queue_for_their_cards() {
    let mut engine = seeded();
    assert_eq!(engine.members_awaiting_card().len(), 2);

    let run = engine.issue_cards().unwrap();

    assert_eq!(
        run.issued,
        vec![
            IssuedCard {
                member_uid: ALICE.to_string(),
                card_number: "1-1".to_string()
            },
            IssuedCard {
                member_uid: BEN.to_string(),
                card_number: "2-1".to_string()
            },
        ]
    );
    assert!(engine.members_awaiting_card().is_empty());
    assert_eq!(
        engine.hub().subscribers(NEW_CARDS_EVENT),
        &[ALICE.to_string(), BEN.to_string()]
    );

    // a second run has nothing to do
    assert!(engine.issue_cards().unwrap().issued.is_empty());
}

#[test]
fn reissuing_a_card_bumps_the_issue_number() {
    let mut engine = seeded();
    engine.issue_cards().unwrap();

    let reissue = engine.reissue_card(ALICE).unwrap();

    assert_eq!(reissue.issued[0].card_number, "1-2");
    assert_eq!(engine.members().get(ALICE).unwrap().card_number(), "1-2");
}

#[test]
fn enrollment_allocates_the_next_free_uid() {
    let mut engine = seeded();
    let outcome = engine
        .enroll_member("Chandra", "Rao", "female", "chandra@example.com")
        .unwrap();
    assert_eq!(outcome.member_uid, "3");
    assert!(engine.members().get("3").unwrap().awaiting_card());
}

// Store that refuses every write, to prove saves never abort an operation

struct FailingStore;

impl SnapshotStore for FailingStore {
    fn save(&self, name: &str, _snapshot: &Snapshot) -> StoreResult<()> {
        Err(StoreError::Write {
            name: name.to_string(),
            reason: "disk full".to_string(),
        })
    }

    fn restore(&self, name: &str) -> StoreResult<Snapshot> {
        Err(StoreError::NotFound {
            name: name.to_string(),
        })
    }
}

#[test]
fn save_failures_become_warnings_not_errors() {
    let mut engine = seeded_on(Arc::new(FailingStore), LendingPolicy::default());
    let summary = engine.checkout(ALICE, &["1"], day(100)).unwrap();

    assert_eq!(summary.loaned, vec!["1"]);
    assert!(!summary.warnings.is_empty());
    assert!(summary.warnings.iter().all(|w| w.contains("disk full")));
    // the loan still happened in memory
    assert_eq!(engine.ledger().current_holder("1"), Some(ALICE));
}

#[test]
fn restore_all_rebuilds_every_component_from_a_shared_store() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemoryStore::new());
    let mut engine = seeded_on(store.clone(), LendingPolicy::default());
    engine.checkout(ALICE, &["1"], day(100)).unwrap();
    engine.reserve(BEN, "1", day(101)).unwrap();

    let mut revived = LendingEngine::new(store);
    let warnings = revived.restore_all();

    assert!(warnings.is_empty());
    assert_eq!(revived.books().len(), 3);
    assert_eq!(
        revived.books().get("1").unwrap().status(),
        BookStatus::OnLoan
    );
    assert_eq!(revived.ledger().current_holder("1"), Some(ALICE));
    assert_eq!(revived.reservations().front("1").unwrap().member_uid(), BEN);
    assert_eq!(revived.hub().subscribers(LOANS_EVENT), &[ALICE.to_string()]);
    assert_eq!(
        revived.hub().subscribers(RESERVATIONS_EVENT),
        &[BEN.to_string()]
    );
    // the revived engine keeps working
    let outcome = revived.return_book("1", day(102)).unwrap();
    assert_eq!(outcome.notified_reserver, Some(BEN.to_string()));
}

#[test]
fn restore_all_on_a_fresh_store_warns_about_nothing() {
    let mut engine = LendingEngine::new(Arc::new(InMemoryStore::new()));
    assert!(engine.restore_all().is_empty());
    assert!(engine.hub().is_declared(LOANS_EVENT));
}
