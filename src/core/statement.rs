//! Monthly statement business logic
//!
//! Aggregates each supplier's deliveries per calendar month: total liquid latex
//! weight, total coagulum weight and total amount payable. Statements are derived
//! data; refreshing a month recomputes its sums from the ledger and upserts them by
//! `(supplier_id, month)`.

use crate::{
    core::{clock::Clock, directory},
    entities::{Statement, Transaction, statement, transaction},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::BTreeSet;
use tracing::info;

/// Sums of one supplier's deliveries over a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryTotals {
    /// Sum of liquid latex weights
    pub liquid_weight: Decimal,
    /// Sum of coagulum weights
    pub coagulum_weight: Decimal,
    /// Sum of settlement totals
    pub amount: Decimal,
}

/// A statement month: its canonical `YYYY-MM` label and date bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementMonth {
    /// Canonical `YYYY-MM` label
    pub label: String,
    /// First day of the month
    pub start: NaiveDate,
    /// First day of the following month
    pub end: NaiveDate,
}

/// Parses a `YYYY-MM` month.
///
/// # Errors
/// Returns `InvalidMonth` if the value is not a valid month.
pub fn parse_month(value: &str) -> Result<StatementMonth> {
    let invalid = || Error::InvalidMonth {
        value: value.to_string(),
    };
    let trimmed = value.trim();
    if trimmed.len() != 7 {
        return Err(invalid());
    }
    let start =
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(invalid)?;

    Ok(StatementMonth {
        label: start.format("%Y-%m").to_string(),
        start,
        end,
    })
}

fn checked_sum(field: &'static str, acc: Decimal, value: Decimal) -> Result<Decimal> {
    acc.checked_add(value).ok_or_else(|| Error::InvalidQuantity {
        field,
        value: "overflow".to_string(),
        requirement: "must fit the decimal range",
    })
}

/// Sums weights and totals over a set of transactions.
///
/// # Errors
/// Returns `InvalidQuantity` naming the sum that overflows the decimal range.
pub fn summarize(transactions: &[transaction::Model]) -> Result<DeliveryTotals> {
    transactions
        .iter()
        .try_fold(DeliveryTotals::default(), |acc, t| {
            Ok(DeliveryTotals {
                liquid_weight: checked_sum("total_liquid_weight", acc.liquid_weight, t.liquid_weight)?,
                coagulum_weight: checked_sum(
                    "total_coagulum_weight",
                    acc.coagulum_weight,
                    t.coagulum_weight,
                )?,
                amount: checked_sum("total_amount", acc.amount, t.total)?,
            })
        })
}

/// Recomputes and upserts one supplier's statement for a month.
pub(crate) async fn refresh_statement<C>(
    db: &C,
    supplier_id: i64,
    month: &StatementMonth,
    now: NaiveDateTime,
) -> Result<statement::Model>
where
    C: ConnectionTrait,
{
    let transactions = Transaction::find()
        .filter(transaction::Column::SupplierId.eq(supplier_id))
        .filter(transaction::Column::TradeDate.gte(month.start))
        .filter(transaction::Column::TradeDate.lt(month.end))
        .all(db)
        .await?;
    let totals = summarize(&transactions)?;

    let existing = Statement::find()
        .filter(statement::Column::SupplierId.eq(supplier_id))
        .filter(statement::Column::Month.eq(month.label.as_str()))
        .one(db)
        .await?;

    let result = if let Some(current) = existing {
        let mut active_model: statement::ActiveModel = current.into();
        active_model.total_liquid_weight = Set(totals.liquid_weight);
        active_model.total_coagulum_weight = Set(totals.coagulum_weight);
        active_model.total_amount = Set(totals.amount);
        active_model.updated_at = Set(now);
        active_model.update(db).await?
    } else {
        let new_statement = statement::ActiveModel {
            supplier_id: Set(supplier_id),
            month: Set(month.label.clone()),
            total_liquid_weight: Set(totals.liquid_weight),
            total_coagulum_weight: Set(totals.coagulum_weight),
            total_amount: Set(totals.amount),
            updated_at: Set(now),
            ..Default::default()
        };
        new_statement.insert(db).await?
    };

    Ok(result)
}

/// Recomputes one supplier's statement for a `YYYY-MM` month.
///
/// # Errors
/// * `InvalidMonth` if the month does not parse
/// * `UnknownSupplier` if the supplier does not exist
pub async fn refresh_monthly_statement(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    supplier_id: i64,
    month: &str,
) -> Result<statement::Model> {
    let month = parse_month(month)?;

    let txn = db.begin().await?;
    directory::get_supplier_by_id(&txn, supplier_id).await?;
    let result = refresh_statement(&txn, supplier_id, &month, clock.now()).await?;
    txn.commit().await?;

    Ok(result)
}

/// Recomputes the statements of every supplier for a `YYYY-MM` month.
///
/// Covers suppliers with deliveries in the month and suppliers that already have a
/// statement for it, so statements left stale by deleted transactions are zeroed.
pub async fn refresh_monthly_statements(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    month: &str,
) -> Result<Vec<statement::Model>> {
    let month = parse_month(month)?;
    let now = clock.now();

    let txn = db.begin().await?;

    let delivering: Vec<i64> = Transaction::find()
        .select_only()
        .column(transaction::Column::SupplierId)
        .distinct()
        .filter(transaction::Column::TradeDate.gte(month.start))
        .filter(transaction::Column::TradeDate.lt(month.end))
        .into_tuple()
        .all(&txn)
        .await?;
    let stated: Vec<i64> = Statement::find()
        .select_only()
        .column(statement::Column::SupplierId)
        .filter(statement::Column::Month.eq(month.label.as_str()))
        .into_tuple()
        .all(&txn)
        .await?;

    let supplier_ids: BTreeSet<i64> = delivering.into_iter().chain(stated).collect();
    let mut statements = Vec::with_capacity(supplier_ids.len());
    for supplier_id in supplier_ids {
        statements.push(refresh_statement(&txn, supplier_id, &month, now).await?);
    }

    txn.commit().await?;
    info!(
        "Refreshed {} monthly statements for {}",
        statements.len(),
        month.label
    );
    Ok(statements)
}

/// Retrieves a supplier's statements, most recent month first.
pub async fn get_statements_for_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Vec<statement::Model>> {
    directory::get_supplier_by_id(db, supplier_id).await?;

    Statement::find()
        .filter(statement::Column::SupplierId.eq(supplier_id))
        .order_by_desc(statement::Column::Month)
        .all(db)
        .await
        .map_err(Into::into)
}
