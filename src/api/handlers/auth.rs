//! Handlers for registration, login, token refresh and e-mail verification.

use axum::{
    Extension, Form, Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    LoginForm, MessageResponse, RefreshRequest, RegisterRequest, ResendVerificationRequest,
    VerifyEmailParams,
};
use crate::api::dto::user::UserResponse;
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::security::TokenPair;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: Account created, verification e-mail sent
/// - **400 Bad Request**: Invalid e-mail or password length
/// - **409 Conflict**: E-mail already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges credentials for an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /login` (form-encoded, `username` = e-mail)
///
/// # Response
///
/// ```json
/// { "access_token": "...", "refresh_token": "...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// Returns 401 "Invalid credentials" for unknown users, wrong passwords and
/// deactivated accounts alike.
pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(pair))
}

/// Rotates a refresh token.
///
/// # Endpoint
///
/// `POST /refresh`
///
/// The presented refresh token stops working once this call succeeds.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(pair))
}

/// Revokes the caller's refresh token.
///
/// # Endpoint
///
/// `POST /logout` (authenticated)
///
/// Issued access tokens stay valid until they expire.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirms an e-mail address from the link sent at registration.
///
/// # Endpoint
///
/// `GET /verify-email?token=...`
pub async fn verify_email_handler(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<MessageResponse>, AppError> {
    state.user_service.verify_email(&params.token).await?;
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Sends a new verification link.
///
/// # Endpoint
///
/// `POST /verify-email/resend`
///
/// Always answers 202 with the same body, whether or not the address exists.
pub async fn resend_verification_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    payload.validate()?;

    state
        .user_service
        .resend_verification(&payload.email)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "If the account exists and is not verified, a verification email has been sent",
        )),
    ))
}
