use actix_web::{web, Scope};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use vaultly_repo::transaction_repo::{Filter, MonthlyTotal, TransactionRepo};

use crate::error::HandlerError;

pub mod handlers;

pub fn report_service() -> Scope {
    web::scope("/reports")
        .service(handlers::get_summary)
        .service(handlers::get_comparison)
        .service(handlers::get_cashflow)
        .service(handlers::get_chart)
        .service(handlers::export_csv)
}

/// Relative change in percent. A zero base short-circuits instead of
/// dividing: flat stays 0, anything appearing from nothing counts as a
/// full swing.
fn percent_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return if current.is_zero() {
            0.0
        } else if current > Decimal::ZERO {
            100.0
        } else {
            -100.0
        };
    }
    let change = (current - previous) / previous.abs() * Decimal::ONE_HUNDRED;
    change.to_f64().unwrap_or_default()
}

/// Monthly totals over the range with every month present, zero-filled
/// where no transactions landed, oldest first. The chart relies on the
/// series covering the full range.
async fn monthly_series(
    transaction_repo: &Arc<dyn TransactionRepo>,
    user: &str,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<MonthlyTotal>, HandlerError> {
    if until < from {
        return Err(HandlerError::Validation(
            "until must not be before from".to_owned(),
        ));
    }

    let filter = Filter {
        from: Some(from),
        until: Some(until),
        ..Filter::NONE
    };
    let totals = transaction_repo.get_monthly_totals(user, filter).await?;
    let by_month: HashMap<NaiveDate, MonthlyTotal> =
        totals.into_iter().map(|t| (t.month, t)).collect();

    let mut series = Vec::new();
    let mut cursor = month_start(from);
    let end = month_start(until);
    while cursor <= end {
        let total = by_month
            .get(&cursor)
            .cloned()
            .unwrap_or_else(|| MonthlyTotal::new(cursor, Decimal::ZERO, Decimal::ZERO));
        series.push(total);
        cursor = cursor
            .checked_add_months(Months::new(1))
            .expect("month arithmetic should not overflow");
    }
    Ok(series)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month is always valid")
}

#[cfg(test)]
mod tests {
    use super::percent_change;
    use rust_decimal::Decimal;

    #[::core::prelude::v1::test]
    fn change_against_zero_base() {
        assert_eq!(0.0, percent_change(Decimal::ZERO, Decimal::ZERO));
        assert_eq!(100.0, percent_change(Decimal::from(250), Decimal::ZERO));
        assert_eq!(-100.0, percent_change(Decimal::from(-250), Decimal::ZERO));
    }

    #[::core::prelude::v1::test]
    fn change_against_nonzero_base() {
        assert_eq!(50.0, percent_change(Decimal::from(300), Decimal::from(200)));
        assert_eq!(-25.0, percent_change(Decimal::from(150), Decimal::from(200)));
    }

    #[::core::prelude::v1::test]
    fn change_against_negative_base() {
        // balances can go negative; the denominator uses the magnitude
        assert_eq!(
            150.0,
            percent_change(Decimal::from(50), Decimal::from(-100))
        );
    }
}
