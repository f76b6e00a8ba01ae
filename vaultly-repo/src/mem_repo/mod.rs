use crate::{HealthCheck, Repos};
use async_trait::async_trait;
use std::sync::Arc;

mod category_repo;
mod session_repo;
mod transaction_repo;
mod user_repo;

struct MemHealth;

#[async_trait]
impl HealthCheck for MemHealth {
    async fn check(&self) -> bool {
        true
    }
}

pub fn create_repos() -> Repos {
    Repos {
        transactions: Arc::new(transaction_repo::MemTransactionRepo::new()),
        categories: Arc::new(category_repo::MemCategoryRepo::new()),
        users: Arc::new(user_repo::MemUserRepo::new()),
        sessions: Arc::new(session_repo::MemSessionRepo::new()),
        health: Arc::new(MemHealth),
    }
}
