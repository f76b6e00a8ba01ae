use actix_web::web::Data;
use actix_web::{web, HttpResponse, Responder};
use rust_decimal::Decimal;
use std::sync::Arc;
use vaultly_repo::category_repo::{CategoryRepo, CategoryRepoError};
use vaultly_repo::transaction_repo::{PageOptions, TransactionRepo};

use crate::error::HandlerError;
use crate::transaction::models::{
    Pagination, TransactionPage, TransactionQuery, TransactionRequest,
};
use crate::user::UserId;

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let query = query.into_inner();
    let filter = query.filter();
    let (page, limit) = query.page_options();

    let page_options = PageOptions {
        offset: (page - 1) * limit,
        limit,
    };
    let data = transaction_repo
        .get_all_transactions(&user_id, filter, Some(page_options))
        .await?;
    let total = transaction_repo.count_transactions(&user_id, filter).await?;
    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(HttpResponse::Ok().json(TransactionPage {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }))
}

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .get_transaction(&user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    new_transaction: web::Json<TransactionRequest>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let new_transaction = new_transaction.into_inner();

    validate_transaction(category_repo.get_ref(), &user_id, &new_transaction).await?;
    let transaction = transaction_repo
        .create_new_transaction(&user_id, new_transaction.into_new_transaction())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
    updated_transaction: web::Json<TransactionRequest>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let updated_transaction = updated_transaction.into_inner();

    validate_transaction(category_repo.get_ref(), &user_id, &updated_transaction).await?;
    let transaction = transaction_repo
        .update_transaction(
            &user_id,
            transaction_id.into_inner(),
            updated_transaction.into_new_transaction(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .delete_transaction(&user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

async fn validate_transaction(
    category_repo: &Arc<dyn CategoryRepo>,
    user: &str,
    request: &TransactionRequest,
) -> Result<(), HandlerError> {
    if request.amount <= Decimal::ZERO {
        return Err(HandlerError::Validation(
            "Amount must be positive".to_owned(),
        ));
    }
    if let Some(category_id) = request.category_id {
        let category = match category_repo.get_category(user, category_id).await {
            Ok(category) => category,
            Err(CategoryRepoError::CategoryNotFound(id)) => {
                return Err(HandlerError::Validation(format!(
                    "Category {} does not exist",
                    id
                )));
            }
            Err(e) => return Err(e.into()),
        };
        if category.category_type != request.transaction_type {
            return Err(HandlerError::Validation(format!(
                "Category {} is not an {} category",
                category.name, request.transaction_type
            )));
        }
    }
    Ok(())
}
