use crate::session_repo::SessionRepoError::SessionNotFound;
use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct MemSessionRepo {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemSessionRepo {
    pub fn new() -> MemSessionRepo {
        MemSessionRepo {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl SessionRepo for MemSessionRepo {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;
        write_guard.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError> {
        let read_guard = self.read_lock()?;
        read_guard.get(session_id).cloned().ok_or(SessionNotFound)
    }

    async fn extend_session(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;
        match write_guard.get_mut(session_id) {
            Some(session) => {
                session.expires_at = expires_at;
                Ok(())
            }
            None => Err(SessionNotFound),
        }
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;
        if write_guard.remove(session_id).is_some() {
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
        let mut write_guard = self.write_lock()?;
        write_guard.retain(|id, session| {
            session.user_id != user_id || keep.map(|k| k == id).unwrap_or(false)
        });
        Ok(())
    }
}
