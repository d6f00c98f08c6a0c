//! Lending Policy
//!
//! Circulation rules as data. Deserializes from configuration with
//! per-field defaults, so a config file only names what it overrides.

use serde::{Deserialize, Serialize};

/// Rules the lending engine enforces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    /// Most books one member may hold at once
    pub max_loans: u32,
    /// Days a loan may run before fines accrue
    pub max_loan_days: i64,
    /// Fine charged per day past the limit
    pub daily_fine: f64,
    /// Queue a member automatically when their checkout is declined
    /// because another member has the book reserved
    pub reserve_on_decline: bool,
    /// Enrol unknown members automatically when they reserve
    pub auto_enroll_reservers: bool,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            max_loans: 5,
            max_loan_days: 14,
            daily_fine: 1.0,
            reserve_on_decline: false,
            auto_enroll_reservers: false,
        }
    }
}

impl LendingPolicy {
    pub fn with_max_loans(mut self, max_loans: u32) -> Self {
        self.max_loans = max_loans;
        self
    }

    pub fn with_max_loan_days(mut self, max_loan_days: i64) -> Self {
        self.max_loan_days = max_loan_days;
        self
    }

    pub fn with_daily_fine(mut self, daily_fine: f64) -> Self {
        self.daily_fine = daily_fine;
        self
    }

    pub fn with_reserve_on_decline(mut self, enabled: bool) -> Self {
        self.reserve_on_decline = enabled;
        self
    }

    pub fn with_auto_enroll_reservers(mut self, enabled: bool) -> Self {
        self.auto_enroll_reservers = enabled;
        self
    }

    /// Fine owed for a loan of `duration` days; `None` when returned in
    /// time
    pub fn fine_for(&self, duration: i64) -> Option<f64> {
        let overdue = duration - self.max_loan_days;
        (overdue > 0).then(|| overdue as f64 * self.daily_fine)
    }
}
