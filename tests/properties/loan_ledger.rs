//! Property tests for the single-holder loan invariant.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use circulate::{Date, InMemoryStore, LoanLedger};

fn day(n: i64) -> Date {
    Date::from_day_count(n)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A book never carries two open loans, whatever order
    /// loans open and close in.
    #[test]
    fn property_at_most_one_open_loan_per_book(
        ops in proptest::collection::vec((0u8..4, 0u8..4, any::<bool>()), 0..60)
    ) {
        let mut ledger = LoanLedger::new("loans", Arc::new(InMemoryStore::new()));
        let mut holder: HashMap<String, String> = HashMap::new();

        for (step, (book, member, open)) in ops.into_iter().enumerate() {
            let book = format!("b{book}");
            let member = format!("m{member}");
            let date = day(step as i64 + 1);

            if open {
                let result = ledger.open_loan(&book, &member, date);
                if holder.contains_key(&book) {
                    prop_assert!(result.is_err());
                } else {
                    prop_assert!(result.is_ok());
                    holder.insert(book.clone(), member.clone());
                }
            } else {
                let result = ledger.close_loan(&book, &member, date);
                if holder.get(&book).map(String::as_str) == Some(member.as_str()) {
                    prop_assert!(result.is_ok());
                    holder.remove(&book);
                } else {
                    prop_assert!(result.is_err());
                }
            }

            prop_assert_eq!(
                ledger.current_holder(&book),
                holder.get(&book).map(String::as_str)
            );
            prop_assert_eq!(ledger.is_on_loan(&book), holder.contains_key(&book));
        }
    }
}
