//! Core domain entities.
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! and partial updates:
//!
//! - [`User`] / [`NewUser`] / [`UserProfile`]
//! - [`Contact`] / [`NewContact`] / [`ContactPatch`]

pub mod contact;
pub mod user;

pub use contact::{Contact, ContactPatch, NewContact};
pub use user::{NewUser, User, UserProfile, normalize_email};
