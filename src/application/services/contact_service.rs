//! Contact management service.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{
    CacheService, contact_key, get_json, invalidate_quietly, set_json,
};
use serde_json::json;

/// Service for an owner's address book.
///
/// All operations take the owner's id; contacts of other users are
/// indistinguishable from missing ones.
pub struct ContactService<C: ContactRepository> {
    repository: Arc<C>,
    cache: Arc<dyn CacheService>,
}

impl<C: ContactRepository> ContactService<C> {
    /// Creates a new contact service.
    pub fn new(repository: Arc<C>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Creates a contact.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the owner already has a contact with
    /// the same e-mail (case-insensitive).
    pub async fn create(&self, new_contact: NewContact) -> Result<Contact, AppError> {
        if self
            .repository
            .find_by_email(new_contact.user_id, &new_contact.email)
            .await?
            .is_some()
        {
            return Err(duplicate_email(&new_contact.email));
        }

        let contact = self.repository.create(new_contact).await?;
        tracing::debug!(contact_id = contact.id, user_id = contact.user_id, "Contact created");

        Ok(contact)
    }

    /// Lists contacts ordered by id.
    pub async fn list(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Contact>, AppError> {
        self.repository.list(user_id, skip, limit).await
    }

    /// Fetches one contact, reading through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no such contact.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Contact, AppError> {
        let key = contact_key(user_id, id);

        if let Some(contact) = get_json::<Contact>(self.cache.as_ref(), &key).await {
            return Ok(contact);
        }

        let contact = self
            .repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        set_json(self.cache.as_ref(), &key, &contact).await;
        Ok(contact)
    }

    /// Applies the non-blank fields of `patch`.
    ///
    /// A patch with nothing to change returns the current contact.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no such contact.
    /// Returns [`AppError::Conflict`] if the new e-mail belongs to another contact.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: ContactPatch,
    ) -> Result<Contact, AppError> {
        let patch = patch.without_blanks();
        if patch.is_empty() {
            return self.get(user_id, id).await;
        }

        if let Some(email) = &patch.email
            && let Some(existing) = self.repository.find_by_email(user_id, email).await?
            && existing.id != id
        {
            return Err(duplicate_email(email));
        }

        let contact = self
            .repository
            .update(user_id, id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        invalidate_quietly(self.cache.as_ref(), &contact_key(user_id, id)).await;
        Ok(contact)
    }

    /// Deletes a contact and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no such contact.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<Contact, AppError> {
        let contact = self
            .repository
            .delete(user_id, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        invalidate_quietly(self.cache.as_ref(), &contact_key(user_id, id)).await;
        tracing::debug!(contact_id = id, user_id, "Contact deleted");

        Ok(contact)
    }

    /// Case-insensitive substring search over names and e-mail.
    ///
    /// A blank query matches nothing.
    pub async fn search(&self, user_id: i64, query: &str) -> Result<Vec<Contact>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.search(user_id, query).await
    }

    /// Contacts whose birthday falls within `days` days from `today`
    /// (inclusive), soonest first.
    pub async fn upcoming_birthdays(
        &self,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Contact>, AppError> {
        self.repository
            .upcoming_birthdays(user_id, today, days)
            .await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Contact not found", json!({ "id": id }))
}

fn duplicate_email(email: &str) -> AppError {
    AppError::conflict(
        "Contact with this email already exists",
        json!({ "email": email }),
    )
}
