//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing users.
///
/// E-mails passed to this trait are expected to be normalized
/// (see [`crate::domain::entities::normalize_email`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the e-mail is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by e-mail.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Marks the user's e-mail as verified.
    ///
    /// Returns the updated user, or `None` if no user has this e-mail.
    async fn mark_verified(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Sets the `is_active` flag.
    ///
    /// Returns the updated user, or `None` if no user has this e-mail.
    async fn set_active(&self, email: &str, is_active: bool) -> Result<Option<User>, AppError>;

    /// Replaces the avatar URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn update_avatar(&self, user_id: i64, avatar_url: &str) -> Result<User, AppError>;

    /// Stores (or clears, with `None`) the hash of the user's current refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_refresh_token_hash(
        &self,
        user_id: i64,
        token_hash: Option<String>,
    ) -> Result<(), AppError>;

    /// Replaces the refresh-token hash only if the stored one equals `expected`.
    ///
    /// Returns `false` when nothing changed because the token was already
    /// rotated or revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn rotate_refresh_token_hash(
        &self,
        user_id: i64,
        expected: &str,
        new_hash: &str,
    ) -> Result<bool, AppError>;
}
