extern crate rstest;
extern crate serde_json;

use std::str::FromStr;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::web::Data;
use actix_web::App;
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;

use crate::utils::mock::MockAuthentication;
use utils::repos;
use utils::tracing_setup;
use utils::TestUser;
use vaultly_lib::transaction::models::TransactionRequest;
use vaultly_repo::category_repo::{Category, NewCategory};
use vaultly_repo::transaction_repo::Transaction;
use vaultly_repo::transaction_repo::TransactionType::{Expense, Income};
use vaultly_repo::Repos;

#[macro_use]
mod utils;

fn new_category(name: &str) -> NewCategory {
    NewCategory::new(
        name.to_owned(),
        Expense,
        "#f87171".to_owned(),
        "restaurant".to_owned(),
        None,
    )
}

#[rstest]
#[actix_rt::test]
async fn test_create_and_list_categories(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    let request = TestRequest::post()
        .uri("/categories")
        .set_json(new_category("Groceries"))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());
    let created: Category = test::read_body_json(response).await;
    assert_eq!("Groceries", created.name);

    let request = TestRequest::get().uri("/categories").to_request();
    let response = test::call_service(&service, request).await;
    let categories: Vec<Category> = test::read_body_json(response).await;
    assert_eq!(vec![created], categories);

    test_user.delete().await
}

#[rstest]
#[actix_rt::test]
async fn test_duplicate_category_is_409(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    let request = TestRequest::post()
        .uri("/categories")
        .set_json(new_category("Groceries"))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let request = TestRequest::post()
        .uri("/categories")
        .set_json(new_category("Groceries"))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(StatusCode::CONFLICT, response.status());

    test_user.delete().await
}

#[rstest]
#[actix_rt::test]
async fn test_list_categories_by_type(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    for category in [
        new_category("Groceries"),
        NewCategory {
            category_type: Income,
            ..new_category("Salary")
        },
    ] {
        let request = TestRequest::post()
            .uri("/categories")
            .set_json(category)
            .to_request();
        let response = test::call_service(&service, request).await;
        assert!(response.status().is_success());
    }

    let request = TestRequest::get()
        .uri("/categories?type=income")
        .to_request();
    let response = test::call_service(&service, request).await;
    let categories: Vec<Category> = test::read_body_json(response).await;
    assert_eq!(1, categories.len());
    assert_eq!("Salary", categories[0].name);

    test_user.delete().await
}

#[rstest]
#[actix_rt::test]
async fn test_update_category(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    let request = TestRequest::post()
        .uri("/categories")
        .set_json(new_category("Groceries"))
        .to_request();
    let response = test::call_service(&service, request).await;
    let created: Category = test::read_body_json(response).await;

    let request = TestRequest::put()
        .uri(&format!("/categories/{}", created.id))
        .set_json(new_category("Food & Dining"))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());
    let updated: Category = test::read_body_json(response).await;
    assert_eq!(created.id, updated.id);
    assert_eq!("Food & Dining", updated.name);

    test_user.delete().await
}

#[rstest]
#[actix_rt::test]
async fn test_delete_category_detaches_transactions(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    let request = TestRequest::post()
        .uri("/categories")
        .set_json(new_category("Groceries"))
        .to_request();
    let response = test::call_service(&service, request).await;
    let category: Category = test::read_body_json(response).await;

    let transaction = TransactionRequest {
        transaction_type: Expense,
        amount: Decimal::from(30),
        date: NaiveDate::from_str("2024-03-05").unwrap(),
        category_id: Some(category.id),
        description: None,
        status: None,
    };
    let created: Transaction = create_transaction!(&service, transaction);

    let request = TestRequest::delete()
        .uri(&format!("/categories/{}", category.id))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let request = TestRequest::get()
        .uri(&format!("/transactions/{}", created.id))
        .to_request();
    let response = test::call_service(&service, request).await;
    let fetched: Transaction = test::read_body_json(response).await;
    assert_eq!(None, fetched.category_id);

    test_user.delete().await
}

#[rstest]
#[actix_rt::test]
async fn test_seed_is_idempotent(_tracing_setup: &(), repos: Repos) {
    let test_user = TestUser::new(repos.users.clone()).await;
    let app = build_app!(repos, test_user.user_id);
    let service = test::init_service(app).await;

    let request = TestRequest::post().uri("/categories/seed").to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());
    let seeded: Vec<Category> = test::read_body_json(response).await;
    assert!(!seeded.is_empty());

    let request = TestRequest::post().uri("/categories/seed").to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());
    let reseeded: Vec<Category> = test::read_body_json(response).await;
    assert_eq!(seeded.len(), reseeded.len());

    test_user.delete().await
}
