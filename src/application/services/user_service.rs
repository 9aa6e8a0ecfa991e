//! Account lifecycle: registration, e-mail verification and profile updates.

use std::sync::Arc;

use url::Url;

use crate::domain::entities::{NewUser, User, UserProfile, normalize_email};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, invalidate_quietly, user_key};
use crate::infrastructure::mailer::Mailer;
use crate::security::{PasswordHasher, TokenProvider, TokenType};
use serde_json::json;

/// Service managing user accounts.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    tokens: Arc<TokenProvider>,
    hasher: PasswordHasher,
    mailer: Arc<dyn Mailer>,
    public_base_url: Url,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a new user service.
    ///
    /// `public_base_url` is the externally reachable root used to build the
    /// links sent by e-mail.
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        tokens: Arc<TokenProvider>,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
        public_base_url: Url,
    ) -> Self {
        Self {
            repository,
            cache,
            tokens,
            hasher,
            mailer,
            public_base_url,
        }
    }

    /// Registers a new, unverified user and sends the verification e-mail.
    ///
    /// Mail delivery failures are logged and do not fail the registration;
    /// the user can ask for a new link via [`Self::resend_verification`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the e-mail is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let hashed_password = self.hasher.hash(password)?;
        let user = self
            .repository
            .create(NewUser {
                email,
                hashed_password,
                is_verified: false,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        self.send_verification(&user.email).await;

        Ok(user)
    }

    /// Marks the address in a verification token as verified.
    ///
    /// Verifying an already verified address succeeds again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or expired.
    /// Returns [`AppError::Validation`] if the account no longer exists.
    pub async fn verify_email(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.decode(token, TokenType::EmailVerification)?;

        let user = self
            .repository
            .mark_verified(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("Verification error", json!({ "reason": "unknown user" }))
            })?;

        invalidate_quietly(self.cache.as_ref(), &user_key(&user.email)).await;
        tracing::info!(user_id = user.id, "Email verified");

        Ok(user)
    }

    /// Sends a fresh verification link if the account exists and is unverified.
    ///
    /// Succeeds silently otherwise so callers cannot discover which addresses
    /// are registered.
    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);

        match self.repository.find_by_email(&email).await? {
            Some(user) if !user.is_verified => self.send_verification(&user.email).await,
            Some(_) => tracing::debug!("Verification resend skipped: already verified"),
            None => tracing::debug!("Verification resend skipped: unknown address"),
        }

        Ok(())
    }

    /// Replaces the user's avatar URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user was deleted concurrently.
    pub async fn update_avatar(
        &self,
        user: &UserProfile,
        avatar_url: &str,
    ) -> Result<User, AppError> {
        let updated = self.repository.update_avatar(user.id, avatar_url).await?;
        invalidate_quietly(self.cache.as_ref(), &user_key(&user.email)).await;

        Ok(updated)
    }

    /// Builds `{public_base_url}/verify-email?token=...`.
    pub fn verification_link(&self, token: &str) -> Result<Url, AppError> {
        let mut link = self.public_base_url.join("verify-email").map_err(|e| {
            AppError::internal(
                "Failed to build verification link",
                json!({ "reason": e.to_string() }),
            )
        })?;
        link.query_pairs_mut().append_pair("token", token);

        Ok(link)
    }

    async fn send_verification(&self, email: &str) {
        let link = match self
            .tokens
            .issue(email, TokenType::EmailVerification)
            .and_then(|token| self.verification_link(&token))
        {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare verification e-mail");
                return;
            }
        };

        if let Err(e) = self.mailer.send_verification(email, link.as_str()).await {
            tracing::warn!(error = %e, "Verification e-mail not sent");
        }
    }
}
