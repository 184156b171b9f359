//! Session operations
//!
//! Sessions pair an account with its active access/refresh token strings.
//! The refresh cycle mutates only the access-token field in place.

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewSession, Session};

use super::{Database, bounded};

impl Database {
    /// Create a new session
    pub async fn create_session(&self, session: NewSession) -> Result<Session, DbError> {
        let now = Utc::now();
        let result = bounded(
            sqlx::query(
                r#"
                INSERT INTO sessions (account_id, access_token, refresh_token, user_agent, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(session.account_id)
            .bind(&session.access_token)
            .bind(&session.refresh_token)
            .bind(&session.user_agent)
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .fetch_one(&self.pool),
        )
        .await?;

        let id: i64 = result.get("id");

        Ok(Session {
            id,
            account_id: session.account_id,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user_agent: session.user_agent,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a session by its refresh token
    ///
    /// No uniqueness constraint exists on refresh tokens; correctness relies
    /// on the token codec making collisions unforgeable.
    pub async fn get_session_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, DbError> {
        let result = bounded(
            sqlx::query(
                r#"
                SELECT id, account_id, access_token, refresh_token, user_agent, created_at, updated_at
                FROM sessions
                WHERE refresh_token = ?
                "#,
            )
            .bind(refresh_token)
            .fetch_optional(&self.pool),
        )
        .await?;

        result.map(|row| Session::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Replace a session's access token in place
    ///
    /// The refresh token and creation timestamp are left untouched. A
    /// session deleted between lookup and update surfaces as `NotFound`
    /// rather than silent success.
    pub async fn replace_access_token(
        &self,
        session_id: i64,
        new_access_token: &str,
    ) -> Result<(), DbError> {
        let now = Utc::now();
        let result = bounded(
            sqlx::query(
                r#"
                UPDATE sessions
                SET access_token = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(new_access_token)
            .bind(now.to_rfc3339())
            .bind(session_id)
            .execute(&self.pool),
        )
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("session {} not found", session_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::new_in_memory().await.unwrap()
    }

    fn new_session(account_id: i64) -> NewSession {
        NewSession {
            account_id,
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user_agent: "test-agent/1.0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_refresh_token() {
        let db = test_db().await;

        let created = db.create_session(new_session(42)).await.unwrap();
        assert_eq!(created.account_id, 42);

        let found = db
            .get_session_by_refresh_token("refresh-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.access_token, "access-1");
        assert_eq!(found.user_agent, "test-agent/1.0");

        assert!(db
            .get_session_by_refresh_token("unknown")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_replace_access_token_keeps_refresh_token() {
        let db = test_db().await;

        let created = db.create_session(new_session(7)).await.unwrap();

        // Ensure the replacement lands at a strictly later instant.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        db.replace_access_token(created.id, "access-2").await.unwrap();

        let updated = db
            .get_session_by_refresh_token("refresh-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.access_token, "access-2");
        assert_eq!(updated.refresh_token, "refresh-1");
        assert_eq!(
            updated.created_at.timestamp(),
            created.created_at.timestamp()
        );
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_replace_access_token_missing_session() {
        let db = test_db().await;
        let err = db.replace_access_token(999, "access-2").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }
}
