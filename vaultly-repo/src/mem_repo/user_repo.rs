use crate::user_repo::UserRepoError::{UserAlreadyExists, UserNotFound};
use crate::user_repo::{User, UserRepo, UserRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct MemUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl MemUserRepo {
    pub fn new() -> MemUserRepo {
        MemUserRepo {
            users: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<HashMap<String, User>>, anyhow::Error> {
        self.users
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<HashMap<String, User>>, anyhow::Error> {
        self.users
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl UserRepo for MemUserRepo {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserNotFound(user_id.to_owned()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| UserNotFound(email.to_owned()))
    }

    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.values().any(|u| u.email == user.email) {
            return Err(UserAlreadyExists(user.email));
        }

        match write_guard.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(UserAlreadyExists(user.email)),
            Entry::Vacant(e) => {
                e.insert(user);
                Ok(())
            }
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard.entry(user_id.to_owned()) {
            Entry::Occupied(mut e) => {
                let user = e.get_mut();
                if let Some(name) = name {
                    user.name = name;
                }
                if let Some(image) = image {
                    user.image = Some(image);
                }
                user.updated_at = Utc::now();
                Ok(user.clone())
            }
            Entry::Vacant(e) => Err(UserNotFound(e.into_key())),
        }
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard.entry(user_id.to_owned()) {
            Entry::Occupied(mut e) => {
                let user = e.get_mut();
                user.password_hash = password_hash.to_owned();
                user.updated_at = Utc::now();
                Ok(())
            }
            Entry::Vacant(e) => Err(UserNotFound(e.into_key())),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.remove(user_id).is_some() {
            Ok(())
        } else {
            Err(UserNotFound(user_id.to_owned()))
        }
    }
}
