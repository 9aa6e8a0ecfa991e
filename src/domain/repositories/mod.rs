//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by `crate::infrastructure::persistence`. Mock implementations
//! are generated via `mockall` for unit tests.
//!
//! - [`UserRepository`] - User accounts and token bookkeeping
//! - [`ContactRepository`] - Owner-scoped contact CRUD and queries
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod contact_repository;
pub mod user_repository;

pub use contact_repository::ContactRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
