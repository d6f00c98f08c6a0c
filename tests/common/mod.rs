//! Common fixtures for circulation scenario tests.
//!
//! Provides a canned catalogue and member register in the delimited
//! import format, plus builders for an engine seeded from them.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use circulate::{
    Date, DelimitedRecordSource, InMemoryStore, LendingEngine, LendingPolicy, SnapshotStore,
};

/// Marker line used by the fixture files
pub const MARKER: &str = "===";

pub const CATALOGUE: &str = "\
===
uid: 101
title: The Left Hand of Darkness
author: Ursula K. Le Guin
genre: Sci-fi

===
uid: 102
title: Beloved
author: Toni Morrison
genre: Fiction

===
uid: 103
title: Persuasion
author: Jane Austen
genre: Classic

===
uid: 104
title: The Fifth Season
author: N. K. Jemisin
genre: Fantasy
";

pub const REGISTER: &str = "\
===
uid: 1
first_name: Alice
last_name: Nilsen
gender: female
email: alice@example.com

===
uid: 2
first_name: Ben
last_name: Okafor
gender: male
email: ben@example.com

===
uid: 3
first_name: Chandra
last_name: Rao
gender: female
email: chandra@example.com
";

pub fn day(n: i64) -> Date {
    Date::from_day_count(n)
}

/// Four books and three members, loaded through the import pipeline
pub fn seeded_library(store: Arc<dyn SnapshotStore>) -> LendingEngine {
    seeded_library_with(store, LendingPolicy::default())
}

pub fn seeded_library_with(store: Arc<dyn SnapshotStore>, policy: LendingPolicy) -> LendingEngine {
    let mut engine = LendingEngine::with_policy(store, policy);
    let mut books = DelimitedRecordSource::from_reader(Cursor::new(CATALOGUE), MARKER).unwrap();
    let mut members = DelimitedRecordSource::from_reader(Cursor::new(REGISTER), MARKER).unwrap();
    engine.seed_books(&mut books).unwrap();
    engine.seed_members(&mut members).unwrap();
    engine
}

pub fn in_memory_library() -> LendingEngine {
    seeded_library(Arc::new(InMemoryStore::new()))
}
