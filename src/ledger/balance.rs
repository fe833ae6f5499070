use thiserror::Error;
use tracing::info;

use crate::{identities::domain::users::User, store::DynCollection};

#[derive(Debug, Error)]
pub enum AdjustBalanceError {
    /// The balance cannot be adjusted because its owner does not exist.
    #[error("no user with id {0:?}")]
    UserNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Applies signed deltas to user balances.
///
/// This is the only place a balance changes. It is deliberately a separate,
/// independently awaited operation from the ledger-entry write: the two
/// documents are not updated transactionally, and keeping the calls apart
/// lets a transactional wrapper be layered in later without restructuring
/// the services.
#[derive(Clone)]
pub struct BalanceAdjuster {
    users: DynCollection<User>,
}

impl BalanceAdjuster {
    pub fn new(users: DynCollection<User>) -> Self {
        Self { users }
    }

    /// Add `delta` to the user's balance and return the new balance.
    pub async fn adjust(&self, user_id: &str, delta: f64) -> Result<f64, AdjustBalanceError> {
        let mut user = self
            .users
            .get(&user_id.to_owned())
            .await?
            .ok_or_else(|| AdjustBalanceError::UserNotFound(user_id.to_owned()))?;

        user.balance += delta;
        self.users.replace(&user.id, &user).await?;

        info!(user_id, delta, balance = user.balance, "Adjusted user balance.");

        Ok(user.balance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use crate::store::{memory::MemoryCollection, Collection};

    use super::*;

    fn user(id: &str, balance: f64) -> User {
        User {
            id: id.to_owned(),
            user_name: "Dana Levi".to_owned(),
            password: "Sup3r&Secret".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "052-1234567".to_owned(),
            birth_date: Utc::now() - Duration::days(30 * 365),
            balance,
        }
    }

    #[tokio::test]
    async fn adjust_applies_signed_deltas() -> anyhow::Result<()> {
        let users = Arc::new(MemoryCollection::new());
        users.insert(&user("325962801", 100.0)).await?;
        let adjuster = BalanceAdjuster::new(users.clone());

        assert_eq!(40.0, adjuster.adjust("325962801", -60.0).await?);
        assert_eq!(65.0, adjuster.adjust("325962801", 25.0).await?);

        let stored = users.get(&"325962801".to_owned()).await?.unwrap();
        assert_eq!(65.0, stored.balance);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_missing_user_fails_without_writing() -> anyhow::Result<()> {
        let users: Arc<MemoryCollection<User>> = Arc::new(MemoryCollection::new());
        let adjuster = BalanceAdjuster::new(users.clone());

        let result = adjuster.adjust("325962801", -60.0).await;

        assert!(matches!(
            result,
            Err(AdjustBalanceError::UserNotFound(id)) if id == "325962801"
        ));
        assert!(users.list_all().await?.is_empty());

        Ok(())
    }
}
