//! User entity representing an account that owns contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user without credentials: what the request path needs and what the
/// cache stores under `user:{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Returns true if the user may call protected endpoints.
    ///
    /// `require_verified` mirrors the `REQUIRE_EMAIL_VERIFICATION` setting.
    pub fn can_access(&self, require_verified: bool) -> bool {
        self.is_active && (!require_verified || self.is_verified)
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            is_verified: user.is_verified,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// Input data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_verified: bool,
}

/// Normalizes an e-mail address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
