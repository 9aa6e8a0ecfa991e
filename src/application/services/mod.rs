//! Business logic services for the application layer.

pub mod account_service;
pub mod auth_service;
pub mod contact_service;
pub mod user_service;

pub use account_service::{AccountService, AccountSummary};
pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use user_service::UserService;
