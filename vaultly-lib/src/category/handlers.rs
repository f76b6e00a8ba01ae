use actix_web::web::Data;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;
use vaultly_repo::category_repo::{CategoryRepo, CategoryRepoError, NewCategory};
use vaultly_repo::transaction_repo::{TransactionRepo, TransactionType};

use crate::category::default_categories;
use crate::error::HandlerError;
use crate::user::UserId;

#[derive(Deserialize, Debug)]
pub struct CategoryQuery {
    #[serde(rename = "type")]
    pub category_type: Option<TransactionType>,
}

#[get("")]
pub async fn get_all_categories(
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<CategoryQuery>,
) -> Result<impl Responder, HandlerError> {
    let categories = category_repo
        .get_all_categories(&user_id.into_inner(), query.category_type)
        .await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("")]
pub async fn create_category(
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    new_category: web::Json<NewCategory>,
) -> Result<impl Responder, HandlerError> {
    let new_category = new_category.into_inner();
    if new_category.name.trim().is_empty() {
        return Err(HandlerError::Validation(
            "Category name must not be empty".to_owned(),
        ));
    }
    let category = category_repo
        .create_category(&user_id.into_inner(), new_category)
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[put("/{category_id}")]
pub async fn update_category(
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    category_id: web::Path<i32>,
    updated_category: web::Json<NewCategory>,
) -> Result<impl Responder, HandlerError> {
    let updated_category = updated_category.into_inner();
    if updated_category.name.trim().is_empty() {
        return Err(HandlerError::Validation(
            "Category name must not be empty".to_owned(),
        ));
    }
    let category = category_repo
        .update_category(
            &user_id.into_inner(),
            category_id.into_inner(),
            updated_category,
        )
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[delete("/{category_id}")]
pub async fn delete_category(
    category_repo: Data<Arc<dyn CategoryRepo>>,
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    category_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let category_id = category_id.into_inner();

    // Transactions keep their rows and show up as uncategorized.
    transaction_repo.clear_category(&user_id, category_id).await?;
    let category = category_repo.delete_category(&user_id, category_id).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[post("/seed")]
pub async fn seed_categories(
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();

    for new_category in default_categories() {
        match category_repo.create_category(&user_id, new_category).await {
            Ok(_) | Err(CategoryRepoError::CategoryAlreadyExists(_)) => {}
            Err(e) => {
                warn!(%user_id, error = %e, "Unable to seed category");
                return Err(e.into());
            }
        }
    }

    let categories = category_repo.get_all_categories(&user_id, None).await?;
    Ok(HttpResponse::Ok().json(categories))
}
