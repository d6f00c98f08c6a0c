//! Property tests for reservation queue ordering.

use std::sync::Arc;

use proptest::prelude::*;

use circulate::{Date, InMemoryStore, ReservationQueue};

fn day(n: i64) -> Date {
    Date::from_day_count(n)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Positions always match arrival order, reserving twice
    /// changes nothing, and cancelling closes the gap.
    #[test]
    fn property_queue_keeps_arrival_order(
        ops in proptest::collection::vec((0u8..6, any::<bool>()), 0..50)
    ) {
        let mut queue = ReservationQueue::new("reservations", Arc::new(InMemoryStore::new()));
        let mut model: Vec<String> = Vec::new();

        for (step, (member, join)) in ops.into_iter().enumerate() {
            let member = format!("m{member}");
            if join {
                let position = queue.reserve("401", &member, day(step as i64 + 1));
                if !model.contains(&member) {
                    model.push(member.clone());
                }
                let expected = model.iter().position(|queued| queued == &member);
                prop_assert_eq!(Some(position), expected);
            } else if let Some(index) = model.iter().position(|queued| queued == &member) {
                prop_assert!(queue.cancel("401", &member).is_ok());
                model.remove(index);
            } else {
                prop_assert!(queue.cancel("401", &member).is_err());
            }

            prop_assert_eq!(queue.queue_len("401"), model.len());
            for (index, queued) in model.iter().enumerate() {
                prop_assert_eq!(queue.position_of("401", queued), Some(index));
            }
        }
        prop_assert_eq!(queue.has_queue("401"), !model.is_empty());
    }
}
