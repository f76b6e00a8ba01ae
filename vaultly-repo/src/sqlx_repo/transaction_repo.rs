use crate::sqlx_repo::SqlxRepo;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, MonthlyTotal, NewTransaction, PageOptions, Summary, Transaction, TransactionRepo,
    TransactionRepoError, TransactionStatus, TransactionType,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{query_as, Postgres, QueryBuilder};
use tracing::instrument;

const TRANSACTION_COLUMNS: &str =
    "id, transaction_type, amount, date, category_id, description, status";

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i32,
    transaction_type: TransactionType,
    amount: Decimal,
    date: NaiveDate,
    category_id: Option<i32>,
    description: Option<String>,
    status: TransactionStatus,
}

impl From<TransactionEntry> for Transaction {
    fn from(value: TransactionEntry) -> Self {
        Transaction::new(
            value.id,
            value.transaction_type,
            value.amount,
            value.date,
            value.category_id,
            value.description,
            value.status,
        )
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    total_income: Option<Decimal>,
    total_expense: Option<Decimal>,
    transaction_count: i64,
}

#[derive(sqlx::FromRow)]
struct MonthlyTotalRow {
    month: Option<NaiveDateTime>,
    income: Option<Decimal>,
    expense: Option<Decimal>,
}

fn push_filter(query_builder: &mut QueryBuilder<Postgres>, filter: Filter) {
    if let Some(from) = filter.from {
        query_builder.push(" AND date >= ").push_bind(from);
    }
    if let Some(until) = filter.until {
        query_builder.push(" AND date <= ").push_bind(until);
    }
    if let Some(category_id) = filter.category_id {
        query_builder
            .push(" AND category_id = ")
            .push_bind(category_id);
    }
    if let Some(transaction_type) = filter.transaction_type {
        query_builder
            .push(" AND transaction_type = ")
            .push_bind(transaction_type);
    }
    if let Some(status) = filter.status {
        query_builder.push(" AND status = ").push_bind(status);
    }
}

#[async_trait]
impl TransactionRepo for SqlxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: Option<TransactionEntry> = query_as(&format!(
            "SELECT {} FROM transactions WHERE id = $1 AND user_id = $2",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        entry
            .ok_or(TransactionNotFound(transaction_id))
            .map(|t| t.into())
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new(format!(
            "SELECT {} FROM transactions WHERE user_id = ",
            TRANSACTION_COLUMNS
        ));
        query_builder.push_bind(user);
        push_filter(&mut query_builder, filter);
        query_builder.push(" ORDER BY date DESC, id DESC");
        if let Some(po) = page_options {
            query_builder
                .push(" OFFSET ")
                .push_bind(po.offset)
                .push(" LIMIT ")
                .push_bind(po.limit);
        }
        let entries: Vec<TransactionEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get transactions for user {}", user))?;
        Ok(entries.into_iter().map(|entry| entry.into()).collect())
    }

    #[instrument(skip(self))]
    async fn count_transactions(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<i64, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new("SELECT COUNT(*) FROM transactions WHERE user_id = ");
        query_builder.push_bind(user);
        push_filter(&mut query_builder, filter);
        let count: i64 = query_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to count transactions for user {}", user))?;
        Ok(count)
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: TransactionEntry = query_as(&format!(
            "INSERT INTO transactions(user_id, transaction_type, amount, date, category_id, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TRANSACTION_COLUMNS
        ))
        .bind(user)
        .bind(new_transaction.transaction_type)
        .bind(new_transaction.amount)
        .bind(new_transaction.date)
        .bind(new_transaction.category_id)
        .bind(new_transaction.description)
        .bind(new_transaction.status)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert transaction")?;
        Ok(entry.into())
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: Option<TransactionEntry> = query_as(&format!(
            "UPDATE transactions SET transaction_type = $1, amount = $2, date = $3, category_id = $4, \
             description = $5, status = $6 WHERE user_id = $7 AND id = $8 RETURNING {}",
            TRANSACTION_COLUMNS
        ))
        .bind(updated_transaction.transaction_type)
        .bind(updated_transaction.amount)
        .bind(updated_transaction.date)
        .bind(updated_transaction.category_id)
        .bind(updated_transaction.description)
        .bind(updated_transaction.status)
        .bind(user)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;
        entry
            .ok_or(TransactionNotFound(transaction_id))
            .map(|t| t.into())
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: Option<TransactionEntry> = query_as(&format!(
            "DELETE FROM transactions WHERE user_id = $1 AND id = $2 RETURNING {}",
            TRANSACTION_COLUMNS
        ))
        .bind(user)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;
        entry
            .ok_or(TransactionNotFound(transaction_id))
            .map(|t| t.into())
    }

    #[instrument(skip(self))]
    async fn get_summary(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<Summary, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new(
            r#"
            SELECT SUM(amount) FILTER (WHERE transaction_type = 'income')  as total_income,
                   SUM(amount) FILTER (WHERE transaction_type = 'expense') as total_expense,
                   COUNT(*)                                                as transaction_count
            FROM transactions
            WHERE status = 'approved' AND user_id =
            "#,
        );
        query_builder.push_bind(user);
        push_filter(&mut query_builder, filter);

        let row: SummaryRow = query_builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to get summary for user {}", user))?;

        Ok(Summary::new(
            row.total_income.unwrap_or(Decimal::ZERO),
            row.total_expense.unwrap_or(Decimal::ZERO),
            row.transaction_count,
        ))
    }

    #[instrument(skip(self))]
    async fn get_monthly_totals(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<Vec<MonthlyTotal>, TransactionRepoError> {
        let mut query_builder = QueryBuilder::new(
            r#"
            SELECT DATE_TRUNC('month', date)                               as month,
                   SUM(amount) FILTER (WHERE transaction_type = 'income')  as income,
                   SUM(amount) FILTER (WHERE transaction_type = 'expense') as expense
            FROM transactions
            WHERE status = 'approved' AND user_id =
            "#,
        );
        query_builder.push_bind(user);
        push_filter(&mut query_builder, filter);
        query_builder.push(" GROUP BY month ORDER BY month DESC");

        let rows: Vec<MonthlyTotalRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get monthly totals for {}", user))?;

        let monthly_totals = rows
            .into_iter()
            .map(|row| {
                // month is DATE_TRUNC over a NOT NULL column, never null
                let month = row.month.expect("DATE_TRUNC of a NOT NULL date").date();
                MonthlyTotal::new(
                    month,
                    row.income.unwrap_or(Decimal::ZERO),
                    row.expense.unwrap_or(Decimal::ZERO),
                )
            })
            .collect();

        Ok(monthly_totals)
    }

    #[instrument(skip(self))]
    async fn clear_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<(), TransactionRepoError> {
        sqlx::query("UPDATE transactions SET category_id = NULL WHERE user_id = $1 AND category_id = $2")
            .bind(user)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to detach category {} from transactions", category_id))?;
        Ok(())
    }
}
