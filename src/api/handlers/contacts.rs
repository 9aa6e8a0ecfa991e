//! Handlers for contact endpoints. Every route acts on the caller's own contacts.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::api::dto::contact::{ContactCreateRequest, ContactUpdateRequest, SearchParams};
use crate::api::dto::pagination::{BirthdayParams, PaginationParams};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::Contact;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a contact.
///
/// # Endpoint
///
/// `POST /contacts`
///
/// # Response Codes
///
/// - **201 Created**
/// - **400 Bad Request**: Validation failed
/// - **409 Conflict**: The caller already has a contact with this e-mail
/// - **429 Too Many Requests**: Per-user creation quota exhausted
pub async fn create_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ContactCreateRequest>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    state.contact_limiter.check(user.id)?;
    let payload = payload.trimmed();
    payload.validate()?;

    let contact = state
        .contact_service
        .create(payload.into_new_contact(user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Lists contacts ordered by id.
///
/// # Endpoint
///
/// `GET /contacts?skip=0&limit=100`
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let (skip, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|msg| AppError::bad_request(msg, json!({})))?;

    let contacts = state.contact_service.list(user.id, skip, limit).await?;
    Ok(Json(contacts))
}

/// `GET /contacts/{id}`
pub async fn get_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    let contact = state.contact_service.get(user.id, id).await?;
    Ok(Json(contact))
}

/// Partially updates a contact.
///
/// # Endpoint
///
/// `PUT /contacts/{id}`
///
/// Only fields that are present and non-blank are changed.
pub async fn update_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ContactUpdateRequest>,
) -> Result<Json<Contact>, AppError> {
    let payload = payload.without_blanks();
    payload.validate()?;

    let contact = state
        .contact_service
        .update(user.id, id, payload.into())
        .await?;

    Ok(Json(contact))
}

/// Deletes a contact and returns it.
///
/// # Endpoint
///
/// `DELETE /contacts/{id}`
pub async fn delete_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    let contact = state.contact_service.delete(user.id, id).await?;
    Ok(Json(contact))
}

/// Searches first name, last name and e-mail.
///
/// # Endpoint
///
/// `GET /contacts/search?query=...`
///
/// Matching is a case-insensitive substring match; `%` and `_` are literal.
pub async fn search_contacts_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let query = params.query.unwrap_or_default();
    let contacts = state.contact_service.search(user.id, &query).await?;
    Ok(Json(contacts))
}

/// Contacts with a birthday in the next `days` days (today included).
///
/// # Endpoint
///
/// `GET /contacts/birthdays?days=7`
pub async fn birthdays_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<BirthdayParams>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let days = params
        .validate_and_get_days()
        .map_err(|msg| AppError::bad_request(msg, json!({ "days": params.days })))?;

    let today = Utc::now().date_naive();
    let contacts = state
        .contact_service
        .upcoming_birthdays(user.id, today, days)
        .await?;

    Ok(Json(contacts))
}
