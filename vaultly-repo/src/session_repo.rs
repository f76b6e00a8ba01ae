use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[async_trait]
pub trait SessionRepo: Sync + Send {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError>;
    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError>;
    async fn extend_session(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepoError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError>;
    /// Deletes every session belonging to the user except `keep`, if given.
    async fn delete_user_sessions(
        &self,
        user_id: &str,
        keep: Option<&str>,
    ) -> Result<(), SessionRepoError>;
}

#[derive(Clone, PartialEq, Debug)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub const fn new(
        id: String,
        user_id: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Session {
        Session {
            id,
            user_id,
            created_at,
            expires_at,
        }
    }
}

// The session id is a bearer secret, so the not-found variant does not echo it.
#[derive(Error, Debug)]
pub enum SessionRepoError {
    #[error("Session not found")]
    SessionNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
