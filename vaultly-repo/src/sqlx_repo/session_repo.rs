use crate::session_repo::SessionRepoError::SessionNotFound;
use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use crate::sqlx_repo::SqlxRepo;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

#[derive(sqlx::FromRow)]
struct SessionEntry {
    id: String,
    user_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionEntry> for Session {
    fn from(value: SessionEntry) -> Self {
        Session::new(
            value.id,
            value.user_id,
            value.created_at,
            value.expires_at,
        )
    }
}

#[async_trait]
impl SessionRepo for SqlxRepo {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        query(
            "INSERT INTO sessions(id, user_id, created_at, expires_at) VALUES($1, $2, $3, $4)",
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to create session for user {}", session.user_id))?;
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError> {
        let entry: Option<SessionEntry> = query_as(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .context("Unable to get session")?;
        entry.ok_or(SessionNotFound).map(|s| s.into())
    }

    async fn extend_session(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepoError> {
        let result = query("UPDATE sessions SET expires_at = $1 WHERE id = $2")
            .bind(expires_at)
            .bind(session_id)
            .execute(&self.pool)
            .await
            .context("Unable to extend session")?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(SessionNotFound)
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError> {
        let result = query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .context("Unable to delete session")?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(SessionNotFound)
        }
    }

    async fn delete_user_sessions(
        &self,
        user_id: &str,
        keep: Option<&str>,
    ) -> Result<(), SessionRepoError> {
        let delete_query = if let Some(keep) = keep {
            query("DELETE FROM sessions WHERE user_id = $1 AND id <> $2")
                .bind(user_id)
                .bind(keep)
        } else {
            query("DELETE FROM sessions WHERE user_id = $1").bind(user_id)
        };
        delete_query
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete sessions for user {}", user_id))?;
        Ok(())
    }
}
