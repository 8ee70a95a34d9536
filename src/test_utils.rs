//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating directory records and prices with sensible defaults.

use crate::{
    config::settings::{CompanySeed, SupplierSeed},
    core::{clock::FixedClock, directory, pricing},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a decimal literal.
///
/// # Panics
/// Panics if `value` is not a decimal number.
#[allow(clippy::unwrap_used)]
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// The trading day most tests run on: 2024-05-01.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
}

/// A clock pinned to [`test_date`] at the given time of day.
pub fn test_clock(hour: u32, min: u32, sec: u32) -> FixedClock {
    FixedClock::new(
        test_date()
            .and_hms_opt(hour, min, sec)
            .unwrap_or_default(),
    )
}

/// Creates a company with a manager account named after it.
pub async fn create_test_company(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::company::Model> {
    let seed = CompanySeed {
        name: name.to_string(),
        manager_username: format!("manager-{name}"),
        manager_name: None,
        phone: None,
        email: None,
    };
    directory::register_company(db, &seed, test_date()).await
}

/// Creates a supplier affiliated with `company`.
///
/// # Defaults
/// * `phone`: same as `username`
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    username: &str,
    rfid: &str,
    company: &str,
) -> Result<entities::supplier::Model> {
    let seed = SupplierSeed {
        username: username.to_string(),
        rfid: Some(rfid.to_string()),
        phone: Some(username.to_string()),
        company: Some(company.to_string()),
        ..Default::default()
    };
    directory::register_supplier(db, &seed, test_date()).await
}

/// Sets a company's prices for `date` to 20000 (liquid) and 18000 (coagulum).
pub async fn set_test_price(
    db: &DatabaseConnection,
    company: &str,
    date: &str,
) -> Result<entities::price_entry::Model> {
    pricing::upsert_price(db, company, date, dec("20000"), dec("18000")).await
}
