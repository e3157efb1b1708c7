//! Refresh-token session models.

use spark_core::types::Timestamp;

/// A refresh session. Only the SHA-256 hash of the refresh token is kept.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
