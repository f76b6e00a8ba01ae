use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vaultly_repo::transaction_repo::{
    Filter, NewTransaction, Transaction, TransactionStatus, TransactionType,
};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Deserialize, Debug)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TransactionQuery {
    pub fn filter(&self) -> Filter {
        Filter {
            from: self.from,
            until: self.until,
            category_id: self.category_id,
            transaction_type: self.transaction_type,
            status: self.status,
        }
    }

    pub fn page_options(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        (page, limit)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TransactionPage {
    pub data: Vec<Transaction>,
    pub pagination: Pagination,
}

/// Body of create/update requests; `status` defaults to approved, matching
/// how the dashboard records transactions.
#[derive(Serialize, Deserialize, Clone)]
pub struct TransactionRequest {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
}

impl TransactionRequest {
    pub fn into_new_transaction(self) -> NewTransaction {
        NewTransaction::new(
            self.transaction_type,
            self.amount,
            self.date,
            self.category_id,
            self.description,
            self.status.unwrap_or(TransactionStatus::Approved),
        )
    }
}
