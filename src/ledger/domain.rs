//! Ledger entry documents.
//!
//! Expenses and revenues are structurally identical; only the serialized
//! counterparty field and the direction in which they move the owner's
//! balance differ. The [`LedgerEntry`] trait captures that difference so a
//! single service implementation covers both ledgers.

use chrono::{DateTime, Utc};
use semval::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{identities::domain::users::is_nine_digits, store::Document};

/// A purchase recorded against a user. Creating one decreases the owner's
/// balance by `amount`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub beneficiary: String,
    pub documentation: String,
}

/// Income recorded for a user. Creating one increases the owner's balance by
/// `amount`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Revenue {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub benefactor: String,
    pub documentation: String,
}

/// Behavior common to both ledgers.
pub trait LedgerEntry: Document<Key = i64> + Validate<Invalidity = EntryInvalidity> {
    /// Direction in which a created entry moves the owner's balance: `-1`
    /// for expenses, `+1` for revenues. Updates apply `sign * (new - old)`
    /// and deletes restore `-sign * amount`, so the one constant fixes the
    /// delta for every mutation.
    const BALANCE_SIGN: f64;

    /// Human-readable entry kind used in log fields and error messages.
    const KIND: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn user_id(&self) -> &str;

    fn amount(&self) -> f64;
}

impl Document for Expense {
    type Key = i64;

    const COLLECTION: &'static str = "expenses";

    fn key(&self) -> i64 {
        self.id
    }
}

impl LedgerEntry for Expense {
    const BALANCE_SIGN: f64 = -1.0;
    const KIND: &'static str = "expense";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Document for Revenue {
    type Key = i64;

    const COLLECTION: &'static str = "revenues";

    fn key(&self) -> i64 {
        self.id
    }
}

impl LedgerEntry for Revenue {
    const BALANCE_SIGN: f64 = 1.0;
    const KIND: &'static str = "revenue";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OwnerIdInvalidity {
    /// The owning user id is not exactly nine ASCII digits.
    NotNineDigits,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AmountInvalidity {
    Negative,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryDateInvalidity {
    InFuture,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryInvalidity {
    OwnerId(OwnerIdInvalidity),
    Amount(AmountInvalidity),
    Date(EntryDateInvalidity),
}

fn validate_entry(
    user_id: &str,
    amount: f64,
    date: DateTime<Utc>,
) -> ValidationResult<EntryInvalidity> {
    ValidationContext::new()
        .invalidate_if(
            !is_nine_digits(user_id),
            EntryInvalidity::OwnerId(OwnerIdInvalidity::NotNineDigits),
        )
        .invalidate_if(
            amount < 0.0,
            EntryInvalidity::Amount(AmountInvalidity::Negative),
        )
        .invalidate_if(
            date > Utc::now(),
            EntryInvalidity::Date(EntryDateInvalidity::InFuture),
        )
        .into()
}

impl Validate for Expense {
    type Invalidity = EntryInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        validate_entry(&self.user_id, self.amount, self.date)
    }
}

impl Validate for Revenue {
    type Invalidity = EntryInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        validate_entry(&self.user_id, self.amount, self.date)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn expense() -> Expense {
        Expense {
            id: 1,
            user_id: "325962801".to_owned(),
            amount: 100.0,
            date: Utc::now() - Duration::days(1),
            beneficiary: "Corner Store".to_owned(),
            documentation: "groceries".to_owned(),
        }
    }

    #[test]
    fn valid_expense_passes_validation() {
        assert!(expense().validate().is_ok());
    }

    #[test]
    fn negative_amount_is_invalid() {
        let mut entry = expense();
        entry.amount = -5.0;

        let context = entry.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == EntryInvalidity::Amount(AmountInvalidity::Negative)));
    }

    #[test]
    fn zero_amount_is_valid() {
        let mut entry = expense();
        entry.amount = 0.0;

        assert!(entry.validate().is_ok());
    }

    #[test]
    fn future_date_is_invalid() {
        let mut entry = expense();
        entry.date = Utc::now() + Duration::days(2);

        let context = entry.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == EntryInvalidity::Date(EntryDateInvalidity::InFuture)));
    }

    #[test]
    fn malformed_owner_id_is_invalid() {
        let mut entry = expense();
        entry.user_id = "not-an-id".to_owned();

        let context = entry.validate().unwrap_err();

        assert!(context
            .into_iter()
            .any(|i| i == EntryInvalidity::OwnerId(OwnerIdInvalidity::NotNineDigits)));
    }

    #[test]
    fn entry_documents_use_the_original_field_names() -> anyhow::Result<()> {
        let serialized = serde_json::to_value(Revenue {
            id: 3,
            user_id: "325962801".to_owned(),
            amount: 75.0,
            date: Utc::now() - Duration::days(1),
            benefactor: "Employer".to_owned(),
            documentation: "salary".to_owned(),
        })?;

        assert_eq!("325962801", serialized["userId"]);
        assert!(serialized.get("user_id").is_none());
        assert_eq!("Employer", serialized["benefactor"]);

        Ok(())
    }
}
