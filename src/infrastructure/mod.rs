//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain and application layers:
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`mailer`] - Outgoing e-mail

pub mod cache;
pub mod mailer;
pub mod persistence;
