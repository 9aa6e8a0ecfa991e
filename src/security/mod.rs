//! Credential handling: password hashing and signed tokens.
//!
//! - [`password`] - Argon2id password hashing
//! - [`jwt`] - JWT issuing and validation for access, refresh and e-mail verification tokens

pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenPair, TokenProvider, TokenType};
pub use password::PasswordHasher;
