//! Seller account models.

use serde::Serialize;
use spark_core::types::Timestamp;

/// A registered seller (or the bootstrap admin).
#[derive(Debug, Clone)]
pub struct User {
    /// Internal id; also the owner id stamped on jobs.
    pub id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub business_name: String,
    pub created_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// DTO for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub seller_id: String,
    pub seller_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Public user info; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub email: String,
    pub business_name: String,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            seller_id: user.seller_id.clone(),
            seller_name: user.seller_name.clone(),
            email: user.email.clone(),
            business_name: user.business_name.clone(),
            role: user.role.clone(),
        }
    }
}
