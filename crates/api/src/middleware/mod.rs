//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a JWT Bearer token.

pub mod auth;
