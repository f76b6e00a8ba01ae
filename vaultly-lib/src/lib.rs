#[macro_use]
extern crate actix_web;

pub mod auth;
pub mod category;
pub mod chart;
pub mod config;
mod error;
pub mod report;
pub mod telemetry;
pub mod time;
pub mod transaction;
pub mod user;
