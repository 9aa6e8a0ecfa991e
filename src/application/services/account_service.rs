//! Administrative account operations used by the `admin` binary.
//!
//! Every write drops the `user:{email}` cache entry so the request path sees
//! the new state on its next lookup.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NewUser, User, normalize_email};
use crate::domain::repositories::{ContactRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, invalidate_quietly, user_key};
use crate::security::PasswordHasher;

/// A user together with the size of their address book.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub user: User,
    pub contacts: i64,
}

/// Service for operator-driven account management.
pub struct AccountService<U: UserRepository, C: ContactRepository> {
    users: Arc<U>,
    contacts: Arc<C>,
    cache: Arc<dyn CacheService>,
    hasher: PasswordHasher,
}

impl<U: UserRepository, C: ContactRepository> AccountService<U, C> {
    pub fn new(
        users: Arc<U>,
        contacts: Arc<C>,
        cache: Arc<dyn CacheService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            contacts,
            cache,
            hasher,
        }
    }

    /// Lists all users ordered by id with their contact counts.
    pub async fn list(&self) -> Result<Vec<AccountSummary>, AppError> {
        let users = self.users.list().await?;

        let mut summaries = Vec::with_capacity(users.len());
        for user in users {
            let contacts = self.contacts.count(user.id).await?;
            summaries.push(AccountSummary { user, contacts });
        }

        Ok(summaries)
    }

    /// Finds a user by (unnormalized) e-mail.
    pub async fn find(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(&normalize_email(email)).await
    }

    /// Creates a user, optionally already verified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the e-mail is already registered.
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        is_verified: bool,
    ) -> Result<User, AppError> {
        let hashed_password = self.hasher.hash(password)?;

        let user = self
            .users
            .create(NewUser {
                email: normalize_email(email),
                hashed_password,
                is_verified,
            })
            .await?;

        tracing::info!(user_id = user.id, "User created by operator");
        Ok(user)
    }

    /// Marks the address as verified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this e-mail.
    pub async fn verify(&self, email: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        let user = self
            .users
            .mark_verified(&email)
            .await?
            .ok_or_else(|| user_not_found(&email))?;

        invalidate_quietly(self.cache.as_ref(), &user_key(&email)).await;
        Ok(user)
    }

    /// Activates or deactivates a user. Deactivation also revokes the refresh
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this e-mail.
    pub async fn set_active(&self, email: &str, is_active: bool) -> Result<User, AppError> {
        let email = normalize_email(email);
        let user = self
            .users
            .set_active(&email, is_active)
            .await?
            .ok_or_else(|| user_not_found(&email))?;

        invalidate_quietly(self.cache.as_ref(), &user_key(&email)).await;
        tracing::info!(user_id = user.id, is_active, "User activity changed by operator");

        Ok(user)
    }
}

fn user_not_found(email: &str) -> AppError {
    AppError::not_found("User not found", json!({ "email": email }))
}
