//! API route configuration.
//!
//! Routes are split by access level: [`public_routes`] need no credentials,
//! [`protected_routes`] require a Bearer access token via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    birthdays_handler, create_contact_handler, delete_contact_handler, get_contact_handler,
    list_contacts_handler, login_handler, logout_handler, me_handler, refresh_handler,
    register_handler, resend_verification_handler, search_contacts_handler,
    update_avatar_handler, update_contact_handler, verify_email_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Account routes reachable without a token.
///
/// # Endpoints
///
/// - `POST /register`             - Create an account
/// - `POST /login`                - Form login, returns a token pair
/// - `POST /refresh`              - Rotate a refresh token
/// - `GET  /verify-email`         - Confirm an e-mail address
/// - `POST /verify-email/resend`  - Send a new verification link
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/verify-email", get(verify_email_handler))
        .route("/verify-email/resend", post(resend_verification_handler))
}

/// Routes acting on the authenticated user.
///
/// # Endpoints
///
/// - `POST   /logout`               - Revoke the refresh token
/// - `GET    /users/me`             - Current user
/// - `PATCH  /users/me/avatar`      - Replace the avatar URL
/// - `GET    /contacts`             - List contacts (paginated)
/// - `POST   /contacts`             - Create a contact
/// - `GET    /contacts/search`      - Search by name or e-mail
/// - `GET    /contacts/birthdays`   - Upcoming birthdays
/// - `GET    /contacts/{id}`        - Fetch one contact
/// - `PUT    /contacts/{id}`        - Partially update a contact
/// - `DELETE /contacts/{id}`        - Delete a contact
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout_handler))
        .route("/users/me", get(me_handler))
        .route("/users/me/avatar", patch(update_avatar_handler))
        .route(
            "/contacts",
            get(list_contacts_handler).post(create_contact_handler),
        )
        .route("/contacts/search", get(search_contacts_handler))
        .route("/contacts/birthdays", get(birthdays_handler))
        .route(
            "/contacts/{id}",
            get(get_contact_handler)
                .put(update_contact_handler)
                .delete(delete_contact_handler),
        )
}
