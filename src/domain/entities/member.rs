//! Member entity - a registered borrower
//!
//! Members receive notices through the `Notifiable` port: a notice is
//! accepted when it is broadcast or addressed to this member's uid, and
//! ignored otherwise.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Entity, Record};
use crate::domain::ports::{require_field, DeliveryError, FieldMap, Notifiable, Notice};

/// Card number of a member who has enrolled but not yet been issued a card
pub const AWAITING_CARD: &str = "0";

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    uid: String,
    first_name: String,
    last_name: String,
    gender: String,
    email: String,
    card_number: String,
    loan_count: u32,
    fines: f64,
}

impl Member {
    /// Enrol a new member; the card is printed later
    pub fn new(
        uid: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender: gender.into(),
            email: email.into(),
            card_number: AWAITING_CARD.to_string(),
            loan_count: 0,
            fines: 0.0,
        }
    }

    // --- Getters ---

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// Enrolled but still waiting for a printed card
    pub fn awaiting_card(&self) -> bool {
        self.card_number == AWAITING_CARD
    }

    /// Number of currently open loans
    pub fn loan_count(&self) -> u32 {
        self.loan_count
    }

    /// Outstanding fine balance
    pub fn fines(&self) -> f64 {
        self.fines
    }

    pub fn has_fine(&self) -> bool {
        self.fines > 0.0
    }

    // --- Mutations (crate-internal) ---

    pub(crate) fn set_card_number(&mut self, card_number: impl Into<String>) {
        self.card_number = card_number.into();
    }

    pub(crate) fn increment_loans(&mut self) {
        self.loan_count += 1;
    }

    pub(crate) fn decrement_loans(&mut self) {
        self.loan_count = self.loan_count.saturating_sub(1);
    }

    pub(crate) fn add_fine(&mut self, amount: f64) {
        self.fines += amount;
    }

    /// Pay down the fine balance; never goes negative. Returns the
    /// remaining balance.
    pub(crate) fn record_payment(&mut self, amount: f64) -> f64 {
        self.fines = (self.fines - amount).max(0.0);
        self.fines
    }
}

impl Entity for Member {
    const KIND: &'static str = "member";

    fn uid(&self) -> &str {
        &self.uid
    }

    fn to_record(&self) -> Record {
        Record::Member(self.clone())
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Member(member) => Some(member),
            _ => None,
        }
    }

    fn from_fields(fields: &FieldMap) -> anyhow::Result<Self> {
        let mut member = Member::new(
            require_field(fields, "uid")?,
            require_field(fields, "first_name")?,
            require_field(fields, "last_name")?,
            require_field(fields, "gender")?,
            require_field(fields, "email")?,
        );
        if let Some(card_number) = fields.get("card_number") {
            member.card_number = card_number.clone();
        }
        Ok(member)
    }
}

impl Notifiable for Member {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn notify(&self, notice: &Notice) -> Result<(), DeliveryError> {
        if notice.addressed_to(&self.uid) {
            tracing::info!(member = %self.uid, "{notice}");
        }
        Ok(())
    }
}
