use std::sync::Arc;

use rstest::*;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

use vaultly_lib::user::UserId;
use vaultly_repo::user_repo::{User, UserRepo};
use vaultly_repo::Repos;

pub mod mock;

macro_rules! build_app {
    ($repos:ident, $user_id:expr) => {{
        let session_auth = vaultly_lib::auth::session::SessionAuth::new($repos.sessions.clone());
        let app = App::new()
            .app_data(Data::new($repos.transactions.clone()))
            .app_data(Data::new($repos.categories.clone()))
            .app_data(Data::new($repos.users.clone()))
            .app_data(Data::new(session_auth))
            .app_data(Data::new(vaultly_lib::auth::CookieSettings { secure: false }))
            .wrap(vaultly_lib::telemetry::create_middleware())
            .service(
                vaultly_lib::transaction::transaction_service()
                    .wrap(MockAuthentication { user_id: $user_id.clone() }),
            )
            .service(
                vaultly_lib::category::category_service()
                    .wrap(MockAuthentication { user_id: $user_id.clone() }),
            )
            .service(
                vaultly_lib::report::report_service()
                    .wrap(MockAuthentication { user_id: $user_id.clone() }),
            );
        tracing::info!("Built app");
        app
    }};
}

macro_rules! create_transaction {
    (&$service:ident, $new_transaction:expr) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json(&$new_transaction)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response when creating transaction",
            response.status()
        );
        test::read_body_json(response).await
    }};
}

pub struct TestUser {
    pub user_id: UserId,
    repo: Arc<dyn UserRepo>,
}

impl TestUser {
    pub async fn new(user_repo: Arc<dyn UserRepo>) -> TestUser {
        let user_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        let user = User::new(
            user_id.to_string(),
            "Test User".to_owned(),
            format!("{}@example.com", user_id),
            vaultly_lib::auth::password::encode_password("password123".to_string()).unwrap(),
        );
        user_repo.create_user(user).await.unwrap();
        info!(%user_id, "Created user");
        TestUser {
            user_id,
            repo: user_repo,
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(&self.user_id).await.unwrap()
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> Repos {
    vaultly_repo::mem_repo::create_repos()
}
