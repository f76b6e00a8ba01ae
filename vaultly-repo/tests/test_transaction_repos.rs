mod utils;

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;
use utils::{RepoType, TestUser};
use vaultly_repo::transaction_repo::TransactionStatus::{Approved, Pending};
use vaultly_repo::transaction_repo::TransactionType::{Expense, Income};
use vaultly_repo::transaction_repo::{
    Filter, NewTransaction, PageOptions, TransactionRepoError, TransactionStatus, TransactionType,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn new_transaction(
    transaction_type: TransactionType,
    amount: i64,
    date_str: &str,
) -> NewTransaction {
    NewTransaction::new(
        transaction_type,
        Decimal::from(amount),
        date(date_str),
        None,
        None,
        Approved,
    )
}

fn new_transaction_with_status(
    transaction_type: TransactionType,
    amount: i64,
    date_str: &str,
    status: TransactionStatus,
) -> NewTransaction {
    NewTransaction {
        status,
        ..new_transaction(transaction_type, amount, date_str)
    }
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_create_and_get_transaction(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let created = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 120, "2024-03-05"))
        .await
        .unwrap();

    let fetched = repos
        .transactions
        .get_transaction(&user.id, created.id)
        .await
        .unwrap();
    assert_eq!(created, fetched);
    assert_eq!(Income, fetched.transaction_type);
    assert_eq!(Decimal::from(120), fetched.amount);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_get_unknown_transaction(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let result = repos.transactions.get_transaction(&user.id, 404).await;
    assert!(matches!(
        result,
        Err(TransactionRepoError::TransactionNotFound(404))
    ));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_users_cannot_see_each_others_transactions(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let alice = TestUser::new(&repos.users).await;
    let bob = TestUser::new(&repos.users).await;

    let created = repos
        .transactions
        .create_new_transaction(&alice.id, new_transaction(Expense, 50, "2024-03-05"))
        .await
        .unwrap();

    let result = repos.transactions.get_transaction(&bob.id, created.id).await;
    assert!(matches!(
        result,
        Err(TransactionRepoError::TransactionNotFound(_))
    ));

    alice.delete().await;
    bob.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_list_is_ordered_by_date_then_id_descending(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let old = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 10, "2024-01-15"))
        .await
        .unwrap();
    let new_first = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 20, "2024-02-15"))
        .await
        .unwrap();
    let new_second = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 30, "2024-02-15"))
        .await
        .unwrap();

    let transactions = repos
        .transactions
        .get_all_transactions(&user.id, Filter::NONE, None)
        .await
        .unwrap();
    let ids: Vec<i32> = transactions.iter().map(|t| t.id).collect();
    assert_eq!(vec![new_second.id, new_first.id, old.id], ids);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_filter_by_date_range_and_type(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 100, "2024-01-10"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 40, "2024-02-10"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 200, "2024-03-10"))
        .await
        .unwrap();

    let filter = Filter {
        from: Some(date("2024-02-01")),
        until: Some(date("2024-03-31")),
        ..Filter::NONE
    };
    let in_range = repos
        .transactions
        .get_all_transactions(&user.id, filter, None)
        .await
        .unwrap();
    assert_eq!(2, in_range.len());

    let income_only = Filter {
        transaction_type: Some(Income),
        ..Filter::NONE
    };
    let incomes = repos
        .transactions
        .get_all_transactions(&user.id, income_only, None)
        .await
        .unwrap();
    assert_eq!(2, incomes.len());
    assert!(incomes.iter().all(|t| t.transaction_type == Income));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_pagination(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    for day in 1..=5 {
        repos
            .transactions
            .create_new_transaction(
                &user.id,
                new_transaction(Expense, day, &format!("2024-03-{:02}", day)),
            )
            .await
            .unwrap();
    }

    let page = repos
        .transactions
        .get_all_transactions(
            &user.id,
            Filter::NONE,
            Some(PageOptions {
                offset: 2,
                limit: 2,
            }),
        )
        .await
        .unwrap();
    assert_eq!(2, page.len());
    assert_eq!(date("2024-03-03"), page[0].date);
    assert_eq!(date("2024-03-02"), page[1].date);

    let total = repos
        .transactions
        .count_transactions(&user.id, Filter::NONE)
        .await
        .unwrap();
    assert_eq!(5, total);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_update_transaction(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let created = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 75, "2024-03-05"))
        .await
        .unwrap();

    let updated = repos
        .transactions
        .update_transaction(&user.id, created.id, new_transaction(Expense, 80, "2024-03-06"))
        .await
        .unwrap();
    assert_eq!(created.id, updated.id);
    assert_eq!(Decimal::from(80), updated.amount);
    assert_eq!(date("2024-03-06"), updated.date);

    let missing = repos
        .transactions
        .update_transaction(&user.id, 404, new_transaction(Expense, 80, "2024-03-06"))
        .await;
    assert!(matches!(
        missing,
        Err(TransactionRepoError::TransactionNotFound(404))
    ));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_delete_transaction(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let created = repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 75, "2024-03-05"))
        .await
        .unwrap();

    let deleted = repos
        .transactions
        .delete_transaction(&user.id, created.id)
        .await
        .unwrap();
    assert_eq!(created, deleted);

    let lookup = repos.transactions.get_transaction(&user.id, created.id).await;
    assert!(matches!(
        lookup,
        Err(TransactionRepoError::TransactionNotFound(_))
    ));

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_summary_counts_approved_only(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 1000, "2024-03-01"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 300, "2024-03-10"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(
            &user.id,
            new_transaction_with_status(Expense, 9999, "2024-03-15", Pending),
        )
        .await
        .unwrap();

    let summary = repos
        .transactions
        .get_summary(&user.id, Filter::NONE)
        .await
        .unwrap();
    assert_eq!(Decimal::from(1000), summary.total_income);
    assert_eq!(Decimal::from(300), summary.total_expense);
    assert_eq!(Decimal::from(700), summary.net_balance);
    assert_eq!(2, summary.transaction_count);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_monthly_totals(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 500, "2024-01-05"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Expense, 120, "2024-01-20"))
        .await
        .unwrap();
    repos
        .transactions
        .create_new_transaction(&user.id, new_transaction(Income, 700, "2024-03-07"))
        .await
        .unwrap();

    let totals = repos
        .transactions
        .get_monthly_totals(&user.id, Filter::NONE)
        .await
        .unwrap();

    assert_eq!(2, totals.len());
    // most recent month first
    assert_eq!(date("2024-03-01"), totals[0].month);
    assert_eq!(Decimal::from(700), totals[0].income);
    assert_eq!(Decimal::ZERO, totals[0].expense);
    assert_eq!(date("2024-01-01"), totals[1].month);
    assert_eq!(Decimal::from(500), totals[1].income);
    assert_eq!(Decimal::from(120), totals[1].expense);

    user.delete().await
}

#[rstest]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_clear_category(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    let user = TestUser::new(&repos.users).await;

    let category = repos
        .categories
        .create_category(
            &user.id,
            vaultly_repo::category_repo::NewCategory::new(
                "Groceries".to_owned(),
                Expense,
                "#f87171".to_owned(),
                "restaurant".to_owned(),
                None,
            ),
        )
        .await
        .unwrap();

    let created = repos
        .transactions
        .create_new_transaction(
            &user.id,
            NewTransaction {
                category_id: Some(category.id),
                ..new_transaction(Expense, 45, "2024-03-05")
            },
        )
        .await
        .unwrap();
    assert_eq!(Some(category.id), created.category_id);

    repos
        .transactions
        .clear_category(&user.id, category.id)
        .await
        .unwrap();

    let fetched = repos
        .transactions
        .get_transaction(&user.id, created.id)
        .await
        .unwrap();
    assert_eq!(None, fetched.category_id);

    user.delete().await
}
