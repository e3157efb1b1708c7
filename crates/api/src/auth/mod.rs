//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`bootstrap`] -- startup creation of the admin account.

pub mod bootstrap;
pub mod jwt;
pub mod password;
