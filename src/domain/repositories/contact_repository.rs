//! Repository trait for contact data access.

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for managing contacts.
///
/// Every lookup is scoped by `user_id`: a contact owned by someone else is
/// reported exactly like a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgContactRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_contact.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Creates a new contact.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the owner already has a contact with this e-mail.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_contact: NewContact) -> Result<Contact, AppError>;

    /// Finds a contact by id for the given owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<Contact>, AppError>;

    /// Finds a contact by e-mail (case-insensitive) for the given owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, user_id: i64, email: &str)
    -> Result<Option<Contact>, AppError>;

    /// Lists the owner's contacts ordered by id.
    ///
    /// # Arguments
    ///
    /// - `skip` - Number of rows to skip
    /// - `limit` - Maximum number of rows returned
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Contact>, AppError>;

    /// Contacts whose next birthday falls within `days` days of `today`
    /// (both ends inclusive), soonest first, ties by id.
    ///
    /// A 29 February birthday is celebrated on 28 February in common years.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn upcoming_birthdays(
        &self,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Contact>, AppError>;

    /// Finds contacts whose first name, last name or e-mail contains `query`
    /// (case-insensitive, `%` and `_` matched literally).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn search(&self, user_id: i64, query: &str) -> Result<Vec<Contact>, AppError>;

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` if the contact does not exist for this owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new e-mail collides with another contact.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError>;

    /// Deletes a contact and returns it.
    ///
    /// Returns `Ok(None)` if the contact does not exist for this owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, user_id: i64, id: i64) -> Result<Option<Contact>, AppError>;

    /// Counts the owner's contacts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, user_id: i64) -> Result<i64, AppError>;
}
