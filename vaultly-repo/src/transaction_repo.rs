use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;
use std::fmt;
use thiserror::Error;

#[derive(Debug)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => f.write_str("income"),
            TransactionType::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("pending"),
            TransactionStatus::Approved => f.write_str("approved"),
            TransactionStatus::Rejected => f.write_str("rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Filter {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        from: None,
        until: None,
        category_id: None,
        transaction_type: None,
        status: None,
    };
}

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn count_transactions(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<i64, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Totals over approved transactions matching the filter.
    async fn get_summary(&self, user: &str, filter: Filter)
        -> Result<Summary, TransactionRepoError>;

    /// Per-month income/expense totals over approved transactions,
    /// most recent month first. Months without transactions are absent.
    async fn get_monthly_totals(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<Vec<MonthlyTotal>, TransactionRepoError>;

    async fn clear_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<(), TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: i32,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub status: TransactionStatus,
}

impl Transaction {
    pub const fn new(
        id: i32,
        transaction_type: TransactionType,
        amount: Decimal,
        date: NaiveDate,
        category_id: Option<i32>,
        description: Option<String>,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id,
            transaction_type,
            amount,
            date,
            category_id,
            description,
            status,
        }
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let date_ordering = self.date.partial_cmp(&other.date);
        if let Some(Equal) = date_ordering {
            self.id.partial_cmp(&other.id)
        } else {
            date_ordering
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub status: TransactionStatus,
}

impl NewTransaction {
    pub const fn new(
        transaction_type: TransactionType,
        amount: Decimal,
        date: NaiveDate,
        category_id: Option<i32>,
        description: Option<String>,
        status: TransactionStatus,
    ) -> NewTransaction {
        NewTransaction {
            transaction_type,
            amount,
            date,
            category_id,
            description,
            status,
        }
    }

    pub fn to_transaction(self, id: i32) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            date: self.date,
            category_id: self.category_id,
            description: self.description,
            status: self.status,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_balance: Decimal,
    pub transaction_count: i64,
}

impl Summary {
    pub fn new(total_income: Decimal, total_expense: Decimal, transaction_count: i64) -> Summary {
        Summary {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
            transaction_count,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyTotal {
    pub const fn new(month: NaiveDate, income: Decimal, expense: Decimal) -> MonthlyTotal {
        MonthlyTotal {
            month,
            income,
            expense,
        }
    }
}
