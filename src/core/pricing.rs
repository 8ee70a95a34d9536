//! Price book business logic - Daily unit prices per company.
//!
//! Each company publishes one price pair (liquid latex, coagulum) per trading day.
//! Transactions are priced by the entry for their exact trade date; there is no
//! fallback to an earlier day, so a day without prices blocks new deliveries for
//! that company until a manager sets them.

use crate::{
    core::{clock::Clock, directory, settlement},
    entities::{PriceEntry, price_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Date format accepted for effective dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `InvalidDate` for anything else.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Resolves the price entry for a company on an exact date.
///
/// # Errors
/// Returns `PriceNotSet` if no entry exists for that `(company, date)`.
pub async fn resolve<C>(db: &C, company: &str, date: NaiveDate) -> Result<price_entry::Model>
where
    C: ConnectionTrait,
{
    PriceEntry::find()
        .filter(price_entry::Column::Company.eq(company))
        .filter(price_entry::Column::EffectiveDate.eq(date))
        .one(db)
        .await?
        .ok_or_else(|| Error::PriceNotSet {
            company: company.to_string(),
            date,
        })
}

/// Exact-date lookup for callers that pass the date as text.
pub async fn price_for_date(
    db: &DatabaseConnection,
    company: &str,
    date: &str,
) -> Result<price_entry::Model> {
    let date = parse_date(date)?;
    resolve(db, company, date).await
}

/// Returns the most recent price entry in effect today.
///
/// Entries dated in the future are ignored. Entries sharing a date are
/// broken by id, newest first.
///
/// # Errors
/// Returns `NoPriceHistory` if the company has no entry on or before today.
pub async fn latest(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    company: &str,
) -> Result<price_entry::Model> {
    PriceEntry::find()
        .filter(price_entry::Column::Company.eq(company))
        .filter(price_entry::Column::EffectiveDate.lte(clock.today()))
        .order_by_desc(price_entry::Column::EffectiveDate)
        .order_by_desc(price_entry::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NoPriceHistory {
            company: company.to_string(),
        })
}

/// Sets a company's prices for a date, overwriting any entry already there.
///
/// Validation runs before anything touches the store; the existence check,
/// lookup and write happen in one transaction.
///
/// # Arguments
/// * `company` - Company name
/// * `date` - Effective date as `YYYY-MM-DD`
/// * `liquid_price` - Unit price for liquid latex
/// * `coagulum_price` - Unit price for coagulum
///
/// # Errors
/// * `InvalidQuantity` if either price is not positive
/// * `EqualPrices` if the two prices are the same
/// * `InvalidDate` if the date does not parse
/// * `UnknownCompany` if the company does not exist
pub async fn upsert_price(
    db: &DatabaseConnection,
    company: &str,
    date: &str,
    liquid_price: Decimal,
    coagulum_price: Decimal,
) -> Result<price_entry::Model> {
    let company = company.trim();
    if company.is_empty() {
        return Err(Error::EmptyField { field: "company" });
    }
    let liquid_price = settlement::positive("liquid_price", liquid_price)?;
    let coagulum_price = settlement::positive("coagulum_price", coagulum_price)?;
    if liquid_price == coagulum_price {
        return Err(Error::EqualPrices {
            price: liquid_price,
        });
    }
    let effective_date = parse_date(date)?;

    let txn = db.begin().await?;

    if !directory::company_exists(&txn, company).await? {
        return Err(Error::UnknownCompany {
            company: company.to_string(),
        });
    }

    let existing = PriceEntry::find()
        .filter(price_entry::Column::Company.eq(company))
        .filter(price_entry::Column::EffectiveDate.eq(effective_date))
        .one(&txn)
        .await?;

    let result = if let Some(entry) = existing {
        let mut active_model: price_entry::ActiveModel = entry.into();
        active_model.liquid_price = Set(liquid_price);
        active_model.coagulum_price = Set(coagulum_price);
        active_model.update(&txn).await?
    } else {
        let entry = price_entry::ActiveModel {
            effective_date: Set(effective_date),
            company: Set(company.to_string()),
            liquid_price: Set(liquid_price),
            coagulum_price: Set(coagulum_price),
            ..Default::default()
        };
        entry.insert(&txn).await?
    };

    txn.commit().await?;
    info!(
        "Set prices for {} on {}: liquid {}, coagulum {}",
        company, effective_date, liquid_price, coagulum_price
    );
    Ok(result)
}
