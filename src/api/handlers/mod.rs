//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod contacts;
pub mod health;
pub mod users;

pub use auth::{
    login_handler, logout_handler, refresh_handler, register_handler,
    resend_verification_handler, verify_email_handler,
};
pub use contacts::{
    birthdays_handler, create_contact_handler, delete_contact_handler, get_contact_handler,
    list_contacts_handler, search_contacts_handler, update_contact_handler,
};
pub use health::health_handler;
pub use users::{me_handler, update_avatar_handler};
