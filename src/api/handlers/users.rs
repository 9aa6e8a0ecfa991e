//! Handlers for the authenticated user's own profile.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::user::{AvatarUpdateRequest, UserResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /users/me`
pub async fn me_handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}

/// Replaces the caller's avatar.
///
/// # Endpoint
///
/// `PATCH /users/me/avatar`
///
/// # Request Body
///
/// ```json
/// { "avatar_url": "https://cdn.example.com/avatars/42.png" }
/// ```
pub async fn update_avatar_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<AvatarUpdateRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .user_service
        .update_avatar(&user, &payload.avatar_url)
        .await?;

    Ok(Json(updated.into()))
}
