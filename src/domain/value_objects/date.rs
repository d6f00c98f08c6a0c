//! Date value object - day-count calendar dates
//!
//! Circulation records store dates as whole-day counts: day 1 is
//! 1900-01-01 and day 0 is reserved as the "no date" sentinel used by
//! open loans on the wire. Day counts subtract to loan durations.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days from 0001-01-01 (CE day 1) to the 1899-12-31 anchor, so that
/// 1900-01-01 lands on day count 1.
const ANCHOR_DAYS_FROM_CE: i64 = 693_595;

/// A calendar date as a day count since the 1899-12-31 anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(i64);

impl Date {
    /// Wrap a raw day count
    pub const fn from_day_count(days: i64) -> Self {
        Date(days)
    }

    /// Build from a civil date; `None` outside the supported calendar range
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let civil = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Date(i64::from(civil.num_days_from_ce()) - ANCHOR_DAYS_FROM_CE))
    }

    /// Today according to the local clock
    pub fn today() -> Self {
        let civil = Local::now().date_naive();
        Date(i64::from(civil.num_days_from_ce()) - ANCHOR_DAYS_FROM_CE)
    }

    /// The raw day count
    pub fn day_count(&self) -> i64 {
        self.0
    }

    fn civil(&self) -> Option<NaiveDate> {
        let days = i32::try_from(self.0 + ANCHOR_DAYS_FROM_CE).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.civil() {
            Some(civil) => write!(
                f,
                "{:02}/{:02}/{:04}",
                civil.day(),
                civil.month(),
                civil.year()
            ),
            None => write!(f, "day {}", self.0),
        }
    }
}

impl Sub for Date {
    type Output = i64;

    /// Whole days between two dates
    fn sub(self, other: Date) -> i64 {
        self.0 - other.0
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Date {
        Date(self.0 + days)
    }
}
