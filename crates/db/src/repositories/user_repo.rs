//! Repository for seller accounts.

use chrono::Utc;
use spark_core::error::CoreError;

use crate::models::user::{CreateUser, User};
use crate::DbPool;

/// Provides CRUD operations for [`User`] records.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user.
    ///
    /// Emails are compared case-insensitively. Emails and seller ids share
    /// one login namespace, so a new email or seller id that matches any
    /// existing email or seller id is a [`CoreError::Conflict`].
    pub async fn create(pool: &DbPool, input: &CreateUser) -> Result<User, CoreError> {
        let mut users = pool.users.write().await;

        let email = input.email.trim().to_lowercase();
        let seller_id_lower = input.seller_id.to_lowercase();
        let duplicate = users.values().any(|u| {
            u.email == email
                || u.seller_id == input.seller_id
                || u.email == seller_id_lower
                || u.seller_id.to_lowercase() == email
        });
        if duplicate {
            return Err(CoreError::Conflict(
                "User already exists with this email or seller ID".into(),
            ));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            seller_id: input.seller_id.clone(),
            seller_name: input.seller_name.clone(),
            email,
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            business_name: format!("{}'s Store", input.seller_name),
            created_at: Utc::now(),
            last_login_at: None,
        };
        users.insert(user.id.clone(), user.clone());

        tracing::debug!(user_id = %user.id, seller_id = %user.seller_id, "User created");
        Ok(user)
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Option<User> {
        pool.users.read().await.get(id).cloned()
    }

    /// Find a user by email (case-insensitive) or seller id.
    ///
    /// An email match takes precedence over a seller-id match.
    pub async fn find_by_login(pool: &DbPool, login: &str) -> Option<User> {
        let email = login.trim().to_lowercase();
        let users = pool.users.read().await;
        users
            .values()
            .find(|u| u.email == email)
            .or_else(|| users.values().find(|u| u.seller_id == login))
            .cloned()
    }

    /// Stamp `last_login_at` with the current time.
    pub async fn record_successful_login(pool: &DbPool, id: &str) {
        if let Some(user) = pool.users.write().await.get_mut(id) {
            user.last_login_at = Some(Utc::now());
        }
    }
}
