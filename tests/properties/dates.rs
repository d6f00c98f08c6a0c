//! Property tests for day-count date arithmetic.

use proptest::prelude::*;

use circulate::Date;

proptest! {
    /// PROPERTY: Offsetting a date and taking the difference are
    /// inverse operations.
    #[test]
    fn property_offset_and_difference_are_inverses(
        start in 1i64..200_000,
        offset in 0i64..20_000
    ) {
        let date = Date::from_day_count(start);
        prop_assert_eq!((date + offset) - date, offset);
        prop_assert_eq!((date + offset).day_count(), start + offset);
    }

    /// PROPERTY: Every day count in range renders as a calendar date,
    /// never the raw fallback form.
    #[test]
    fn property_day_counts_in_range_render_as_calendar_dates(
        n in 1i64..200_000
    ) {
        let rendered = Date::from_day_count(n).to_string();
        prop_assert!(!rendered.starts_with("day "), "got fallback: {}", rendered);
        prop_assert_eq!(rendered.matches('/').count(), 2);
    }
}
