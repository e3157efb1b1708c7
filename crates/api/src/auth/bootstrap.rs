//! Startup creation of the admin account.

use spark_core::error::CoreError;
use spark_core::roles::ROLE_ADMIN;
use spark_db::models::user::CreateUser;
use spark_db::repositories::UserRepo;
use spark_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Seller id reserved for the bootstrap admin.
pub const ADMIN_SELLER_ID: &str = "admin";

/// Create the admin account unless one already exists for the email.
///
/// Returns `true` when a new account was created.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    if UserRepo::find_by_login(pool, &admin.email).await.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        seller_id: ADMIN_SELLER_ID.to_string(),
        seller_name: "Administrator".to_string(),
        email: admin.email.clone(),
        password_hash,
        role: ROLE_ADMIN.to_string(),
    };

    match UserRepo::create(pool, &input).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "Admin account created");
            Ok(true)
        }
        Err(CoreError::Conflict(msg)) => {
            tracing::warn!(error = %msg, "Admin account not created");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
