use semval::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::store::DynCollection;

use super::domain::users::{User, UserInvalidity};

#[derive(Debug, Error)]
pub enum UserError {
    /// The provided user data is invalid.
    #[error("invalid user data: {0:?}")]
    InvalidUser(semval::context::Context<UserInvalidity>),

    /// A user with the provided identifier already exists.
    #[error("user id {0:?} already exists")]
    DuplicateId(String),

    /// No user matches the provided identifier or email address.
    #[error("user {0:?} not found")]
    NotFound(String),

    /// The email matched a user but the password did not.
    #[error("incorrect password")]
    InvalidCredential,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A service object providing functionality relating to users.
///
/// None of these operations compute a new balance; the balance field rides
/// along with whatever document the caller supplies.
#[derive(Clone)]
pub struct UserService {
    users: DynCollection<User>,
}

impl UserService {
    pub fn new(users: DynCollection<User>) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// The document is stored as provided, including the raw password. The
    /// credential is compared in clear text at login, so hashing it here
    /// would break authentication for existing records.
    pub async fn register(&self, user: User) -> Result<User, UserError> {
        user.validate().map_err(UserError::InvalidUser)?;

        if self.users.get(&user.id).await?.is_some() {
            return Err(UserError::DuplicateId(user.id));
        }

        let stored = self.users.insert(&user).await?;

        info!(user_id = %stored.id, "Registered new user.");

        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list_all().await?)
    }

    pub async fn get(&self, user_id: &str) -> Result<User, UserError> {
        self.users
            .get(&user_id.to_owned())
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_owned()))
    }

    /// Authenticate a user by email and password.
    ///
    /// An unknown email and a wrong password fail differently on purpose: a
    /// missing record is a [`UserError::NotFound`], a mismatched credential
    /// is a [`UserError::InvalidCredential`]. On success the full stored
    /// record, balance included, is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, UserError> {
        let users = self.users.list_all().await?;

        let user = users
            .into_iter()
            .find(|user| user.email == email)
            .ok_or_else(|| UserError::NotFound(email.to_owned()))?;

        if user.password != password {
            return Err(UserError::InvalidCredential);
        }

        info!(user_id = %user.id, "User logged in.");

        Ok(user)
    }

    /// Replace the user's document wholesale. The identifier from the path
    /// wins over whatever the payload carried.
    pub async fn update(&self, user_id: &str, mut user: User) -> Result<User, UserError> {
        user.id = user_id.to_owned();
        user.validate().map_err(UserError::InvalidUser)?;

        // Resolve first so a missing user surfaces as NotFound rather than a
        // store failure.
        self.get(user_id).await?;

        let stored = self.users.replace(&user.id, &user).await?;

        info!(user_id = %stored.id, "Updated user profile.");

        Ok(stored)
    }

    /// Delete the user's document, returning its prior state.
    ///
    /// Ledger entries owned by the user are left in place; there is no
    /// cascade.
    pub async fn delete(&self, user_id: &str) -> Result<User, UserError> {
        let removed = self
            .users
            .remove(&user_id.to_owned())
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_owned()))?;

        info!(user_id, "Deleted user.");

        Ok(removed)
    }
}
