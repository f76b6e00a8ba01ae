use actix_web::{web, Responder, Scope};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub fn time_service() -> Scope {
    web::scope("/time").service(get_time)
}

#[derive(Serialize, Deserialize)]
pub struct TimeResponse {
    pub iso: String,
    /// Unix epoch in milliseconds, as JavaScript clients expect.
    pub unix: i64,
    pub formatted: String,
}

/// Server clock backing the dashboard header; clients poll it every 30
/// seconds to correct local drift.
#[get("")]
pub async fn get_time() -> impl Responder {
    let now = Utc::now();
    web::Json(TimeResponse {
        iso: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        unix: now.timestamp_millis(),
        formatted: now.format("%A, %B %-d, %Y at %I:%M:%S %p").to_string(),
    })
}
