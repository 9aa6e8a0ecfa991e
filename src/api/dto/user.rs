//! DTOs for the current-user endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{User, UserProfile};

/// Public view of a user. Never includes credentials.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            avatar_url: user.avatar_url,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserProfile::from(user).into()
    }
}

/// Request body for `PATCH /users/me/avatar`.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarUpdateRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub avatar_url: String,
}
