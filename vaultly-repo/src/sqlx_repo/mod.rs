mod category_repo;
mod session_repo;
mod transaction_repo;
mod user_repo;

use crate::{HealthCheck, Repos};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct SqlxRepo {
    pool: Pool<Postgres>,
}

/// Connects to PostgreSQL, runs pending migrations and returns the repo
/// handles. All handles share one connection pool.
pub async fn create_repos(database_url: &str, max_pool_size: u32) -> Result<Repos, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    let repo = SqlxRepo { pool };
    Ok(Repos {
        transactions: Arc::new(repo.clone()),
        categories: Arc::new(repo.clone()),
        users: Arc::new(repo.clone()),
        sessions: Arc::new(repo.clone()),
        health: Arc::new(repo),
    })
}

#[async_trait]
impl HealthCheck for SqlxRepo {
    async fn check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
