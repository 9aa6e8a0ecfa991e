//! Authentication service: credentials, token rotation and request identity.

use std::sync::Arc;

use crate::domain::entities::{User, UserProfile, normalize_email};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, get_json, invalidate_quietly, set_json, user_key};
use crate::security::{PasswordHasher, TokenPair, TokenProvider, TokenType};
use serde_json::json;

/// Service for logging users in and resolving bearer tokens to users.
///
/// Refresh tokens are single-use: only the HMAC fingerprint of the most
/// recently issued refresh token is stored, and presenting any other refresh
/// token is rejected.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    tokens: Arc<TokenProvider>,
    hasher: PasswordHasher,
    require_verified: bool,
}

impl<R: UserRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - user repository for DB operations
    /// - `cache` - cache for user lookups on the request path
    /// - `tokens` - JWT provider shared with [`super::UserService`]
    /// - `hasher` - password hasher
    /// - `require_verified` - reject unverified users with 403
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        tokens: Arc<TokenProvider>,
        hasher: PasswordHasher,
        require_verified: bool,
    ) -> Self {
        Self {
            repository,
            cache,
            tokens,
            hasher,
            require_verified,
        }
    }

    /// Resolves an access token to the calling user.
    ///
    /// The user is read through the cache (`user:{email}`), which holds a
    /// [`UserProfile`] and never credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if:
    /// - The token is invalid, expired or not an access token
    /// - The user no longer exists or is inactive
    ///
    /// Returns [`AppError::Forbidden`] if the e-mail is not verified and
    /// verification is required.
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, AppError> {
        let claims = self.tokens.decode(token, TokenType::Access)?;

        let user = self.load_profile(&claims.sub).await?.ok_or_else(|| {
            AppError::unauthorized(
                "Could not validate credentials",
                json!({ "reason": "unknown user" }),
            )
        })?;

        if !user.is_active {
            return Err(AppError::unauthorized(
                "Inactive user",
                json!({ "reason": "account deactivated" }),
            ));
        }

        if !user.can_access(self.require_verified) {
            return Err(AppError::forbidden("Email not verified", json!({})));
        }

        Ok(user)
    }

    /// Checks credentials and issues a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] ("Invalid credentials") for an unknown
    /// e-mail, a wrong password or an inactive account.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        let user = match self.repository.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => return Err(invalid_credentials()),
        };

        if !self.hasher.verify(password, &user.hashed_password)? {
            return Err(invalid_credentials());
        }

        tracing::info!(user_id = user.id, "User logged in");
        self.rotate(&user).await
    }

    /// Exchanges a refresh token for a new pair, invalidating the old one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid, expired,
    /// already used, or belongs to an unknown or inactive user.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.tokens.decode(refresh_token, TokenType::Refresh)?;

        let user = match self.repository.find_by_email(&claims.sub).await? {
            Some(user) if user.is_active => user,
            _ => {
                return Err(AppError::unauthorized(
                    "Invalid refresh token",
                    json!({ "reason": "unknown or inactive user" }),
                ));
            }
        };

        // Compare-and-swap on the stored fingerprint: of two concurrent
        // refreshes with the same token only one can win.
        let pair = self.tokens.issue_pair(&user.email)?;
        let rotated = self
            .repository
            .rotate_refresh_token_hash(
                user.id,
                &self.tokens.fingerprint(refresh_token),
                &self.tokens.fingerprint(&pair.refresh_token),
            )
            .await?;

        if !rotated {
            tracing::warn!(user_id = user.id, "Rejected stale refresh token");
            return Err(AppError::unauthorized(
                "Invalid refresh token",
                json!({ "reason": "token has been revoked or rotated" }),
            ));
        }

        invalidate_quietly(self.cache.as_ref(), &user_key(&user.email)).await;
        Ok(pair)
    }

    /// Revokes the user's refresh token.
    pub async fn logout(&self, user: &UserProfile) -> Result<(), AppError> {
        self.repository
            .set_refresh_token_hash(user.id, None)
            .await?;
        invalidate_quietly(self.cache.as_ref(), &user_key(&user.email)).await;

        tracing::info!(user_id = user.id, "User logged out");
        Ok(())
    }

    async fn rotate(&self, user: &User) -> Result<TokenPair, AppError> {
        let pair = self.tokens.issue_pair(&user.email)?;

        self.repository
            .set_refresh_token_hash(user.id, Some(self.tokens.fingerprint(&pair.refresh_token)))
            .await?;
        invalidate_quietly(self.cache.as_ref(), &user_key(&user.email)).await;

        Ok(pair)
    }

    async fn load_profile(&self, email: &str) -> Result<Option<UserProfile>, AppError> {
        let key = user_key(email);

        if let Some(profile) = get_json::<UserProfile>(self.cache.as_ref(), &key).await {
            return Ok(Some(profile));
        }

        let profile = self
            .repository
            .find_by_email(email)
            .await?
            .map(UserProfile::from);
        if let Some(profile) = &profile {
            set_json(self.cache.as_ref(), &key, profile).await;
        }

        Ok(profile)
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}
