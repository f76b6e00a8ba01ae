use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use std::sync::Arc;
use vaultly_repo::session_repo::{Session, SessionRepo, SessionRepoError};

use crate::user::UserId;

const SESSION_LIFETIME_DAYS: i64 = 30;
const RENEWAL_AGE_DAYS: i64 = 1;

/// Issues and resolves opaque session tokens backed by a [SessionRepo].
#[derive(Clone)]
pub struct SessionAuth {
    session_repo: Arc<dyn SessionRepo>,
}

impl SessionAuth {
    pub fn new(session_repo: Arc<dyn SessionRepo>) -> SessionAuth {
        SessionAuth { session_repo }
    }

    pub async fn open_session(&self, user_id: UserId) -> Result<Session, SessionRepoError> {
        let now = Utc::now();
        let session = Session::new(
            generate_token(),
            user_id,
            now,
            now + Duration::days(SESSION_LIFETIME_DAYS),
        );
        self.session_repo.create_session(session.clone()).await?;
        Ok(session)
    }

    /// Resolves a token to a live session. Expired sessions are deleted on
    /// sight; sessions past the renewal age get a fresh expiry.
    pub async fn validate(&self, token: &str) -> Result<Session, SessionRepoError> {
        let mut session = self.session_repo.get_session(token).await?;
        let now = Utc::now();
        if session.expires_at <= now {
            self.session_repo.delete_session(token).await?;
            return Err(SessionRepoError::SessionNotFound);
        }
        let renew_after =
            session.expires_at - Duration::days(SESSION_LIFETIME_DAYS - RENEWAL_AGE_DAYS);
        if now >= renew_after {
            let expires_at = now + Duration::days(SESSION_LIFETIME_DAYS);
            self.session_repo.extend_session(token, expires_at).await?;
            session.expires_at = expires_at;
        }
        Ok(session)
    }

    pub async fn close_session(&self, token: &str) -> Result<(), SessionRepoError> {
        self.session_repo.delete_session(token).await
    }

    pub async fn close_other_sessions(
        &self,
        user_id: &str,
        keep: &str,
    ) -> Result<(), SessionRepoError> {
        self.session_repo
            .delete_user_sessions(user_id, Some(keep))
            .await
    }

    pub async fn close_all_sessions(&self, user_id: &str) -> Result<(), SessionRepoError> {
        self.session_repo.delete_user_sessions(user_id, None).await
    }
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
