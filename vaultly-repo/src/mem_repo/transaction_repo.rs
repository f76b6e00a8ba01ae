use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    Filter, MonthlyTotal, NewTransaction, PageOptions, Summary, Transaction, TransactionRepo,
    TransactionRepoError, TransactionStatus,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::transaction_repo::TransactionType::Income;

struct State {
    transactions: HashMap<i32, Transaction>,
    user_transactions: HashMap<String, HashSet<i32>>,
    next_id: i32,
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            user_transactions: HashMap::new(),
            next_id: 0,
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

fn matches_filter(transaction: &Transaction, filter: &Filter) -> bool {
    if let Some(from) = filter.from {
        if transaction.date < from {
            return false;
        }
    }
    if let Some(until) = filter.until {
        if transaction.date > until {
            return false;
        }
    }
    if let Some(category_id) = filter.category_id {
        if transaction.category_id != Some(category_id) {
            return false;
        }
    }
    if let Some(transaction_type) = filter.transaction_type {
        if transaction.transaction_type != transaction_type {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if transaction.status != status {
            return false;
        }
    }
    true
}

#[async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as user_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        user: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(user) else {
            return Ok(Vec::new());
        };

        let mut transactions: Vec<Transaction> = transaction_ids
            .iter()
            .map(|id| {
                read_guard
                    .transactions
                    .get(id)
                    .expect("transactions should have all the ids from user_transactions")
            })
            .filter(|t| matches_filter(t, &filter))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        if let Some(page_options) = page_options {
            transactions = transactions
                .into_iter()
                .skip(page_options.offset as usize)
                .take(page_options.limit as usize)
                .collect();
        }

        Ok(transactions)
    }

    async fn count_transactions(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<i64, TransactionRepoError> {
        let transactions = self.get_all_transactions(user, filter, None).await?;
        Ok(transactions.len() as i64)
    }

    async fn create_new_transaction(
        &self,
        user: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let transaction = new_transaction.to_transaction(id);

        write_guard.transactions.insert(id, transaction.clone());
        write_guard
            .user_transactions
            .entry(user.to_owned())
            .or_insert_with(HashSet::new)
            .insert(id);

        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get(user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        };

        let entry = write_guard.transactions.entry(transaction_id);
        if let Entry::Occupied(mut e) = entry {
            let transaction = updated_transaction.to_transaction(transaction_id);
            e.insert(transaction.clone());
            Ok(transaction)
        } else {
            Err(TransactionNotFound(transaction_id))
        }
    }

    async fn delete_transaction(
        &self,
        user: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let owned = write_guard
            .user_transactions
            .get(user)
            .map(|ids| ids.contains(&transaction_id))
            .unwrap_or(false);
        if !owned {
            return Err(TransactionNotFound(transaction_id));
        }

        if let Some(t) = write_guard.transactions.remove(&transaction_id) {
            write_guard
                .user_transactions
                .get_mut(user)
                .expect("ids in transactions should be present in user_transactions")
                .remove(&transaction_id);
            Ok(t)
        } else {
            Err(TransactionNotFound(transaction_id))
        }
    }

    async fn get_summary(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<Summary, TransactionRepoError> {
        let transactions = self.get_all_transactions(user, filter, None).await?;

        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut transaction_count = 0;
        for t in transactions {
            if t.status != TransactionStatus::Approved {
                continue;
            }
            if t.transaction_type == Income {
                total_income += t.amount;
            } else {
                total_expense += t.amount;
            }
            transaction_count += 1;
        }

        Ok(Summary::new(total_income, total_expense, transaction_count))
    }

    async fn get_monthly_totals(
        &self,
        user: &str,
        filter: Filter,
    ) -> Result<Vec<MonthlyTotal>, TransactionRepoError> {
        let transactions = self.get_all_transactions(user, filter, None).await?;

        let mut monthly_totals = HashMap::new();
        for t in transactions {
            if t.status != TransactionStatus::Approved {
                continue;
            }
            let month = NaiveDate::from_ymd_opt(t.date.year(), t.date.month(), 1)
                .expect("Transaction dates should be valid");
            let entry = monthly_totals
                .entry(month)
                .or_insert_with(|| MonthlyTotal::new(month, Decimal::ZERO, Decimal::ZERO));
            if t.transaction_type == Income {
                entry.income += t.amount
            } else {
                entry.expense += t.amount
            }
        }

        let mut monthly_totals: Vec<MonthlyTotal> = monthly_totals.into_values().collect();
        monthly_totals.sort_by(|a, b| b.month.cmp(&a.month));

        Ok(monthly_totals)
    }

    async fn clear_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<(), TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get(user) else {
            return Ok(());
        };
        let transaction_ids: Vec<i32> = transaction_ids.iter().copied().collect();

        for id in transaction_ids {
            if let Some(t) = write_guard.transactions.get_mut(&id) {
                if t.category_id == Some(category_id) {
                    t.category_id = None;
                }
            }
        }
        Ok(())
    }
}
