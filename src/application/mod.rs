//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! caching, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Login, token rotation and request identity
//! - [`services::user_service::UserService`] - Registration, e-mail verification, profile
//! - [`services::contact_service::ContactService`] - Owner-scoped contact management

pub mod services;
