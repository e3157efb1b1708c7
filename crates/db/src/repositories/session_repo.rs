//! Repository for refresh sessions.

use chrono::Utc;

use crate::models::session::{CreateSession, Session};
use crate::DbPool;

/// Provides CRUD operations for [`Session`] records, keyed by token hash.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &DbPool, input: &CreateSession) -> Session {
        let session = Session {
            id: uuid::Uuid::new_v4(),
            user_id: input.user_id.clone(),
            refresh_token_hash: input.refresh_token_hash.clone(),
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        pool.sessions
            .write()
            .await
            .insert(session.refresh_token_hash.clone(), session.clone());
        session
    }

    /// Remove the session for a refresh-token hash and return it if it was
    /// still valid.
    ///
    /// Lookup and removal happen under one write lock, so a refresh token
    /// can be redeemed at most once. Expired sessions are removed too.
    pub async fn take(pool: &DbPool, hash: &str) -> Option<Session> {
        pool.sessions
            .write()
            .await
            .remove(hash)
            .filter(|s| s.expires_at > Utc::now())
    }

    /// Revoke every session of a user. Returns how many were removed.
    pub async fn revoke_all_for_user(pool: &DbPool, user_id: &str) -> usize {
        let mut sessions = pool.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;

    fn input(user_id: &str, hash: &str, days: i64) -> CreateSession {
        CreateSession {
            user_id: user_id.into(),
            refresh_token_hash: hash.into(),
            expires_at: Utc::now() + chrono::Duration::days(days),
        }
    }

    #[tokio::test]
    async fn expired_sessions_are_not_taken() {
        let pool = create_pool();
        SessionRepo::create(&pool, &input("u1", "live", 7)).await;
        SessionRepo::create(&pool, &input("u1", "stale", -1)).await;

        assert!(SessionRepo::take(&pool, "live").await.is_some());
        assert!(SessionRepo::take(&pool, "stale").await.is_none());
        assert!(pool.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_takes_redeem_once() {
        let pool = create_pool();
        SessionRepo::create(&pool, &input("u1", "once", 7)).await;

        let (a, b) = tokio::join!(
            SessionRepo::take(&pool, "once"),
            SessionRepo::take(&pool, "once")
        );
        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
    }

    #[tokio::test]
    async fn revoke_all_only_touches_one_user() {
        let pool = create_pool();
        SessionRepo::create(&pool, &input("u1", "a", 7)).await;
        SessionRepo::create(&pool, &input("u1", "b", 7)).await;
        SessionRepo::create(&pool, &input("u2", "c", 7)).await;

        assert_eq!(SessionRepo::revoke_all_for_user(&pool, "u1").await, 2);
        assert!(SessionRepo::take(&pool, "a").await.is_none());
        assert!(SessionRepo::take(&pool, "c").await.is_some());
    }
}
