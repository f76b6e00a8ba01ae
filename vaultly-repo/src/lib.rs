use async_trait::async_trait;
use std::sync::Arc;

pub mod category_repo;
pub mod session_repo;
pub mod transaction_repo;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

/// The full set of storage handles a server instance runs against. All
/// handles returned by a single `create_repos` call share one backend.
pub struct Repos {
    pub transactions: Arc<dyn transaction_repo::TransactionRepo>,
    pub categories: Arc<dyn category_repo::CategoryRepo>,
    pub users: Arc<dyn user_repo::UserRepo>,
    pub sessions: Arc<dyn session_repo::SessionRepo>,
    pub health: Arc<dyn HealthCheck>,
}
