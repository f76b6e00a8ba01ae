use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{web, HttpResponse, Responder};
use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use vaultly_repo::category_repo::CategoryRepo;
use vaultly_repo::transaction_repo::{Filter, Summary, TransactionRepo};

use crate::chart::{self, Viewport};
use crate::error::HandlerError;
use crate::report::{monthly_series, percent_change};
use crate::user::UserId;

#[derive(Deserialize, Debug)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

impl ReportQuery {
    fn filter(&self) -> Filter {
        Filter {
            from: self.from,
            until: self.until,
            category_id: self.category_id,
            ..Filter::NONE
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct PeriodQuery {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

#[derive(Deserialize, Debug)]
pub struct ChartQuery {
    pub from: NaiveDate,
    pub until: NaiveDate,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct Comparison {
    pub current: Summary,
    pub previous: Summary,
    pub changes: Changes,
}

#[derive(Serialize, Deserialize)]
pub struct Changes {
    pub income_change: f64,
    pub expense_change: f64,
    pub balance_change: f64,
}

#[get("/summary")]
pub async fn get_summary(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<ReportQuery>,
) -> Result<impl Responder, HandlerError> {
    let summary = transaction_repo
        .get_summary(&user_id.into_inner(), query.filter())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Summary of the requested period next to the immediately preceding
/// period of equal length, with percentage changes for the KPI cards.
#[get("/comparison")]
pub async fn get_comparison(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<PeriodQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let PeriodQuery { from, until } = query.into_inner();
    if until < from {
        return Err(HandlerError::Validation(
            "until must not be before from".to_owned(),
        ));
    }

    let length = until - from;
    let previous_until = from - Duration::days(1);
    let previous_from = previous_until - length;

    let current = transaction_repo
        .get_summary(
            &user_id,
            Filter {
                from: Some(from),
                until: Some(until),
                ..Filter::NONE
            },
        )
        .await?;
    let previous = transaction_repo
        .get_summary(
            &user_id,
            Filter {
                from: Some(previous_from),
                until: Some(previous_until),
                ..Filter::NONE
            },
        )
        .await?;

    let changes = Changes {
        income_change: percent_change(current.total_income, previous.total_income),
        expense_change: percent_change(current.total_expense, previous.total_expense),
        balance_change: percent_change(current.net_balance, previous.net_balance),
    };
    Ok(HttpResponse::Ok().json(Comparison {
        current,
        previous,
        changes,
    }))
}

#[get("/cashflow")]
pub async fn get_cashflow(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<PeriodQuery>,
) -> Result<impl Responder, HandlerError> {
    let series = monthly_series(
        transaction_repo.get_ref(),
        &user_id.into_inner(),
        query.from,
        query.until,
    )
    .await?;
    Ok(HttpResponse::Ok().json(series))
}

#[get("/chart")]
pub async fn get_chart(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<ChartQuery>,
) -> Result<impl Responder, HandlerError> {
    let query = query.into_inner();
    let viewport = match (query.width, query.height) {
        (None, None) => Viewport::default(),
        (width, height) => {
            let width = width.unwrap_or(800.0);
            let height = height.unwrap_or(300.0);
            if !(100.0..=4000.0).contains(&width) || !(100.0..=4000.0).contains(&height) {
                return Err(HandlerError::Validation(
                    "Chart dimensions must be between 100 and 4000".to_owned(),
                ));
            }
            Viewport::sized(width, height)
        }
    };

    let series = monthly_series(
        transaction_repo.get_ref(),
        &user_id.into_inner(),
        query.from,
        query.until,
    )
    .await?;
    Ok(HttpResponse::Ok().json(chart::render(&series, &viewport)))
}

/// Streams the filtered transaction history as a CSV attachment.
#[get("/export")]
pub async fn export_csv(
    transaction_repo: Data<Arc<dyn TransactionRepo>>,
    category_repo: Data<Arc<dyn CategoryRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<ReportQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let transactions = transaction_repo
        .get_all_transactions(&user_id, query.filter(), None)
        .await?;
    let category_names: HashMap<i32, String> = category_repo
        .get_all_categories(&user_id, None)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(["Date", "Type", "Category", "Description", "Amount", "Status"])
        .context("Unable to write CSV header")?;
    for t in transactions {
        let category = t
            .category_id
            .and_then(|id| category_names.get(&id).cloned())
            .unwrap_or_else(|| "Uncategorized".to_owned());
        writer
            .write_record([
                t.date.to_string(),
                t.transaction_type.to_string(),
                category,
                t.description.unwrap_or_default(),
                t.amount.to_string(),
                t.status.to_string(),
            ])
            .context("Unable to write CSV record")?;
    }
    let body = writer
        .into_inner()
        .context("Unable to finish CSV export")?;

    let filename = format!("transactions-{}.csv", Utc::now().date_naive());
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body))
}
