use crate::sqlx_repo::SqlxRepo;
use crate::user_repo::UserRepoError::{UserAlreadyExists, UserNotFound};
use crate::user_repo::{User, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

const USER_COLUMNS: &str = "id, name, email, image, password_hash, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserEntry {
    id: String,
    name: String,
    email: String,
    image: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserEntry> for User {
    fn from(value: UserEntry) -> Self {
        User {
            id: value.id,
            name: value.name,
            email: value.email,
            image: value.image,
            password_hash: value.password_hash,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[async_trait]
impl UserRepo for SqlxRepo {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let entry: Option<UserEntry> = query_as(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", user_id))?;
        entry
            .ok_or_else(|| UserNotFound(user_id.to_owned()))
            .map(|u| u.into())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let entry: Option<UserEntry> = query_as(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user with email {}", email))?;
        entry
            .ok_or_else(|| UserNotFound(email.to_owned()))
            .map(|u| u.into())
    }

    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let result = query(
            "INSERT INTO users(id, name, email, image, password_hash, created_at, updated_at) \
             VALUES($1, $2, $3, $4, $5, $6, $7) ON CONFLICT DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", user.id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserAlreadyExists(user.email))
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<User, UserRepoError> {
        let entry: Option<UserEntry> = query_as(&format!(
            "UPDATE users SET name = COALESCE($1, name), image = COALESCE($2, image), \
             updated_at = NOW() WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(image)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update profile for {}", user_id))?;
        entry
            .ok_or_else(|| UserNotFound(user_id.to_owned()))
            .map(|u| u.into())
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let result = query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to update password for {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserNotFound(user_id.to_owned()))
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserNotFound(user_id.to_owned()))
        }
    }
}
