use std::sync::Arc;

use uuid::Uuid;
use vaultly_repo::user_repo::{User, UserRepo};
use vaultly_repo::Repos;

// The sqlx implementation needs a live PostgreSQL instance and is exercised
// in CI; these tests run the repo contract against the in-memory backend.
#[derive(Debug)]
pub enum RepoType {
    Mem,
}

pub async fn build_repos(repo_type: RepoType) -> Repos {
    match repo_type {
        RepoType::Mem => vaultly_repo::mem_repo::create_repos(),
    }
}

pub struct TestUser {
    pub id: String,
    repo: Arc<dyn UserRepo>,
}

impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let user_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        let user = User::new(
            user_id.clone(),
            "Test User".to_owned(),
            format!("{}@example.com", user_id),
            "not a real hash".to_owned(),
        );
        user_repo.create_user(user).await.unwrap();
        TestUser {
            id: user_id,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(&self.id).await.unwrap()
    }
}
