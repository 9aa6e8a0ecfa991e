//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and `FromRow` row mapping.
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgContactRepository`] - Owner-scoped contacts

pub mod pg_contact_repository;
pub mod pg_user_repository;

pub use pg_contact_repository::PgContactRepository;
pub use pg_user_repository::PgUserRepository;
