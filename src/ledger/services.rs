use semval::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::store::DynCollection;

use super::{
    balance::{AdjustBalanceError, BalanceAdjuster},
    domain::{EntryInvalidity, Expense, LedgerEntry, Revenue},
};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The entry's field-level validation failed.
    #[error("invalid entry data: {0:?}")]
    InvalidEntry(semval::context::Context<EntryInvalidity>),

    /// No entry with the requested id exists.
    #[error("entry {0} not found")]
    EntryNotFound(i64),

    /// The entry exists but is owned by a different user. Kept distinct from
    /// [`LedgerError::EntryNotFound`] so ownership violations are
    /// distinguishable from missing data.
    #[error("attempting to access another user's entry")]
    AnotherUsersEntry,

    #[error(transparent)]
    AdjustBalance(#[from] AdjustBalanceError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ExpenseService = LedgerService<Expense>;
pub type RevenueService = LedgerService<Revenue>;

/// A service object owning one ledger's mutation rules: every write to an
/// entry is mirrored by a balance adjustment on the owning user, and every
/// read is scoped to that owner.
#[derive(Clone)]
pub struct LedgerService<E: LedgerEntry> {
    entries: DynCollection<E>,
    balance: BalanceAdjuster,
}

impl<E: LedgerEntry> LedgerService<E> {
    pub fn new(entries: DynCollection<E>, balance: BalanceAdjuster) -> Self {
        Self { entries, balance }
    }

    /// List every entry owned by the user.
    ///
    /// Scans the whole collection; fine at this system's scale, a known
    /// limit beyond it.
    pub async fn list(&self, user_id: &str) -> Result<Vec<E>, LedgerError> {
        let entries = self.entries.list_all().await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.user_id() == user_id)
            .collect())
    }

    /// Fetch a single entry, scoped to its owner.
    pub async fn get(&self, entry_id: i64, user_id: &str) -> Result<E, LedgerError> {
        let entry = self
            .entries
            .get(&entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        if entry.user_id() != user_id {
            return Err(LedgerError::AnotherUsersEntry);
        }

        Ok(entry)
    }

    /// Record a new entry and move the owner's balance by the entry's
    /// signed amount.
    ///
    /// The balance adjustment and the entry insert are two separate store
    /// writes with no surrounding transaction; if the insert fails the
    /// balance stays moved. See `create_balance_applied_even_if_insert_fails`.
    pub async fn create(&self, mut entry: E) -> Result<E, LedgerError> {
        entry.validate().map_err(LedgerError::InvalidEntry)?;

        let entries = self.entries.list_all().await?;
        // An empty collection starts the id sequence at 1.
        let next_id = entries
            .iter()
            .map(LedgerEntry::id)
            .max()
            .map_or(1, |max| max + 1);
        entry.set_id(next_id);

        let delta = E::BALANCE_SIGN * entry.amount();
        self.balance.adjust(entry.user_id(), delta).await?;

        let stored = self.entries.insert(&entry).await?;

        info!(
            kind = E::KIND,
            id = stored.id(),
            user_id = stored.user_id(),
            delta,
            "Created ledger entry."
        );

        Ok(stored)
    }

    /// Replace an existing entry and move the owner's balance by the signed
    /// difference between the new and old amounts.
    ///
    /// Ownership is re-checked against the payload's owner, and the path id
    /// wins over whatever id the payload carried.
    pub async fn update(&self, entry_id: i64, mut entry: E) -> Result<E, LedgerError> {
        entry.validate().map_err(LedgerError::InvalidEntry)?;

        let existing = self.get(entry_id, entry.user_id()).await?;
        entry.set_id(existing.id());

        let delta = E::BALANCE_SIGN * (entry.amount() - existing.amount());
        self.balance.adjust(entry.user_id(), delta).await?;

        let stored = self.entries.replace(&entry_id, &entry).await?;

        info!(
            kind = E::KIND,
            id = stored.id(),
            user_id = stored.user_id(),
            delta,
            "Updated ledger entry."
        );

        Ok(stored)
    }

    /// Delete an entry, restoring its amount to the owner's balance, and
    /// return the entry's prior state.
    pub async fn delete(&self, entry_id: i64, user_id: &str) -> Result<E, LedgerError> {
        let existing = self.get(entry_id, user_id).await?;

        let delta = -E::BALANCE_SIGN * existing.amount();
        self.balance.adjust(user_id, delta).await?;

        self.entries.remove(&entry_id).await?;

        info!(
            kind = E::KIND,
            id = entry_id,
            user_id,
            delta,
            "Deleted ledger entry."
        );

        Ok(existing)
    }
}
