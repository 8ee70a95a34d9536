//! Transaction business logic - The three-step kiosk protocol and ledger queries.
//!
//! A delivery is captured at the weighing station in three scans of the supplier's
//! RFID card:
//!
//! 1. [`begin_transaction`] weighs the coagulum, snapshots the day's prices and opens
//!    the transaction,
//! 2. [`record_liquid_weight`] weighs the liquid latex,
//! 3. [`record_moisture`] captures the TSC and DRC readings and closes it.
//!
//! The total is recomputed from the snapshotted prices at every step, so it is
//! always consistent with the captured fields. Steps 2 and 3 target the transaction
//! id returned by step 1 when the kiosk sends it; otherwise they fall back to the
//! supplier's most recent transaction opened today. Every step validates its input
//! before the store is touched and runs as one database transaction.

use crate::{
    core::{clock::Clock, directory, pricing, settlement},
    entities::{Transaction, TransactionState, supplier, transaction},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Identifies the transaction a kiosk step applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskScan {
    /// RFID tag scanned at the station
    pub rfid: String,
    /// Id returned by the opening step, if the station kept it
    pub transaction_id: Option<i64>,
}

impl KioskScan {
    /// A scan without an explicit transaction id.
    #[must_use]
    pub fn rfid_only(rfid: impl Into<String>) -> Self {
        Self {
            rfid: rfid.into(),
            transaction_id: None,
        }
    }
}

/// A delivery entered from the back office with an explicit date, time and company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    /// Supplier who delivered
    pub supplier_id: i64,
    /// Trade date, which must have a price entry for the company
    pub trade_date: NaiveDate,
    /// Trade time
    pub trade_time: NaiveTime,
    /// Company bought from; defaults to the supplier's company
    pub company: Option<String>,
    /// Liquid latex weight
    pub liquid_weight: Decimal,
    /// Total solid content of the liquid latex
    pub tsc: Decimal,
    /// Coagulum weight
    pub coagulum_weight: Decimal,
    /// Dry rubber content of the coagulum
    pub drc: Decimal,
}

/// Step 1: weighs the coagulum and opens a transaction.
///
/// The supplier is identified by RFID and must be affiliated with a company that has
/// prices for today. The date and time come from `clock`. Liquid weight, TSC and
/// DRC start at zero.
///
/// Not idempotent: every call opens a new transaction.
///
/// # Errors
/// * `InvalidQuantity` if the weight is not positive
/// * `SupplierNotFound` if the tag is unknown
/// * `SupplierUnaffiliated` if the supplier has no company
/// * `PriceNotSet` if the company has no prices for today
pub async fn begin_transaction(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    rfid: &str,
    coagulum_weight: Decimal,
) -> Result<transaction::Model> {
    let coagulum_weight = settlement::positive("coagulum_weight", coagulum_weight)?;

    let txn = db.begin().await?;

    let supplier = directory::require_supplier_by_rfid(&txn, rfid).await?;
    let company = supplier
        .company
        .clone()
        .ok_or(Error::SupplierUnaffiliated {
            supplier_id: supplier.id,
        })?;

    let trade_date = clock.today();
    let price = pricing::resolve(&txn, &company, trade_date)
        .await
        .inspect_err(|_| warn!("No prices set for {} on {}", company, trade_date))?;

    let total = settlement::settlement_total(
        Decimal::ZERO,
        Decimal::ZERO,
        price.liquid_price,
        coagulum_weight,
        Decimal::ZERO,
        price.coagulum_price,
    )?;

    let transaction_model = transaction::ActiveModel {
        supplier_id: Set(supplier.id),
        trade_date: Set(trade_date),
        trade_time: Set(clock.time_of_day()),
        company: Set(company),
        liquid_weight: Set(Decimal::ZERO),
        tsc: Set(Decimal::ZERO),
        liquid_price: Set(price.liquid_price),
        coagulum_weight: Set(coagulum_weight),
        drc: Set(Decimal::ZERO),
        coagulum_price: Set(price.coagulum_price),
        total: Set(total),
        state: Set(TransactionState::Opened.as_str().to_string()),
        ..Default::default()
    };
    let result = transaction_model.insert(&txn).await?;

    txn.commit().await?;
    info!(
        "Opened transaction {} for supplier {} ({} coagulum)",
        result.id, result.supplier_id, result.coagulum_weight
    );
    Ok(result)
}

/// Finds the transaction a kiosk step should update.
///
/// An explicit id must belong to the scanning supplier. Without one, the supplier's
/// transaction dated today with the latest time is chosen, newest id first on ties.
async fn target_transaction<C>(
    db: &C,
    clock: &dyn Clock,
    supplier: &supplier::Model,
    transaction_id: Option<i64>,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    if let Some(id) = transaction_id {
        return Transaction::find_by_id(id)
            .filter(transaction::Column::SupplierId.eq(supplier.id))
            .one(db)
            .await?
            .ok_or(Error::TransactionNotFound { id });
    }

    let today = clock.today();
    Transaction::find()
        .filter(transaction::Column::SupplierId.eq(supplier.id))
        .filter(transaction::Column::TradeDate.eq(today))
        .order_by_desc(transaction::Column::TradeTime)
        .order_by_desc(transaction::Column::Id)
        .one(db)
        .await?
        .ok_or(Error::NoOpenTransaction {
            supplier_id: supplier.id,
            date: today,
        })
}

/// Step 2: records the liquid latex weight.
///
/// Overwrites any earlier liquid weight, recomputes the total and advances an opened
/// transaction to `liquid_recorded`. A closed transaction stays closed.
///
/// # Errors
/// * `InvalidQuantity` if the weight is not positive
/// * `SupplierNotFound` if the tag is unknown
/// * `TransactionNotFound` if an explicit id is unknown or belongs to someone else
/// * `NoOpenTransaction` if the supplier has no transaction today
pub async fn record_liquid_weight(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    scan: &KioskScan,
    liquid_weight: Decimal,
) -> Result<transaction::Model> {
    let liquid_weight = settlement::positive("liquid_weight", liquid_weight)?;

    let txn = db.begin().await?;

    let supplier = directory::require_supplier_by_rfid(&txn, &scan.rfid).await?;
    let current = target_transaction(&txn, clock, &supplier, scan.transaction_id).await?;

    let state = current.lifecycle_state().after_liquid_weight();
    let total = settlement::transaction_total(&transaction::Model {
        liquid_weight,
        ..current.clone()
    })?;

    let mut active_model: transaction::ActiveModel = current.into();
    active_model.liquid_weight = Set(liquid_weight);
    active_model.total = Set(total);
    active_model.state = Set(state.as_str().to_string());
    let result = active_model.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Recorded {} liquid latex on transaction {} (total {})",
        result.liquid_weight, result.id, result.total
    );
    Ok(result)
}

/// Step 3: records the TSC and DRC readings and closes the transaction.
///
/// Both readings must be positive. They are not capped, since stations may report
/// them as fractions or as percentages. Overwrites earlier readings and persists the
/// recomputed total.
///
/// # Errors
/// Same as [`record_liquid_weight`], with `InvalidQuantity` naming `tsc` or `drc`.
pub async fn record_moisture(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    scan: &KioskScan,
    tsc: Decimal,
    drc: Decimal,
) -> Result<transaction::Model> {
    let tsc = settlement::positive("tsc", tsc)?;
    let drc = settlement::positive("drc", drc)?;

    let txn = db.begin().await?;

    let supplier = directory::require_supplier_by_rfid(&txn, &scan.rfid).await?;
    let current = target_transaction(&txn, clock, &supplier, scan.transaction_id).await?;

    let total = settlement::transaction_total(&transaction::Model {
        tsc,
        drc,
        ..current.clone()
    })?;

    let mut active_model: transaction::ActiveModel = current.into();
    active_model.tsc = Set(tsc);
    active_model.drc = Set(drc);
    active_model.total = Set(total);
    active_model.state = Set(TransactionState::Closed.as_str().to_string());
    let result = active_model.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Closed transaction {} for supplier {} (total {})",
        result.id, result.supplier_id, result.total
    );
    Ok(result)
}

/// Validates a back-office entry and prices it against the company's entry for the
/// trade date. Every field of the returned model is set except the id.
async fn priced_entry<C>(db: &C, entry: &ManualEntry) -> Result<transaction::ActiveModel>
where
    C: ConnectionTrait,
{
    let supplier = directory::get_supplier_by_id(db, entry.supplier_id).await?;
    let company = entry
        .company
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .or(supplier.company)
        .ok_or(Error::SupplierUnaffiliated {
            supplier_id: supplier.id,
        })?;

    let price = match pricing::resolve(db, &company, entry.trade_date).await {
        Ok(price) => price,
        Err(Error::PriceNotSet { company, date }) => {
            return Err(Error::UnpricedTradeDate { company, date });
        }
        Err(e) => return Err(e),
    };

    let total = settlement::settlement_total(
        entry.liquid_weight,
        entry.tsc,
        price.liquid_price,
        entry.coagulum_weight,
        entry.drc,
        price.coagulum_price,
    )?;

    Ok(transaction::ActiveModel {
        supplier_id: Set(supplier.id),
        trade_date: Set(entry.trade_date),
        trade_time: Set(entry.trade_time),
        company: Set(company),
        liquid_weight: Set(entry.liquid_weight),
        tsc: Set(entry.tsc),
        liquid_price: Set(price.liquid_price),
        coagulum_weight: Set(entry.coagulum_weight),
        drc: Set(entry.drc),
        coagulum_price: Set(price.coagulum_price),
        total: Set(total),
        state: Set(TransactionState::Closed.as_str().to_string()),
        ..Default::default()
    })
}

fn validate_entry(entry: &ManualEntry) -> Result<()> {
    settlement::non_negative("liquid_weight", entry.liquid_weight)?;
    settlement::non_negative("tsc", entry.tsc)?;
    settlement::non_negative("coagulum_weight", entry.coagulum_weight)?;
    settlement::non_negative("drc", entry.drc)?;
    Ok(())
}

/// Records a complete delivery entered from the back office.
///
/// Prices are taken from the company's entry for the trade date, and the
/// transaction is stored closed.
///
/// # Errors
/// * `InvalidQuantity` for negative weights or readings
/// * `UnknownSupplier` if the supplier does not exist
/// * `SupplierUnaffiliated` if no company was given and the supplier has none
/// * `UnpricedTradeDate` if the company has no prices for the trade date
pub async fn record_manual_transaction(
    db: &DatabaseConnection,
    entry: &ManualEntry,
) -> Result<transaction::Model> {
    validate_entry(entry)?;

    let txn = db.begin().await?;
    let result = priced_entry(&txn, entry).await?.insert(&txn).await?;
    txn.commit().await?;

    info!(
        "Recorded manual transaction {} for supplier {} on {}",
        result.id, result.supplier_id, result.trade_date
    );
    Ok(result)
}

/// Replaces every captured field of an existing transaction from the back office.
///
/// The entry is priced again for its trade date and company, so prices and total
/// always match the new fields. The transaction ends up closed. Monthly statements
/// are not adjusted until they are next refreshed.
///
/// # Errors
/// * `TransactionNotFound` if the id is unknown
/// * otherwise the same as [`record_manual_transaction`]
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    entry: &ManualEntry,
) -> Result<transaction::Model> {
    validate_entry(entry)?;

    let txn = db.begin().await?;
    Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    let mut active_model = priced_entry(&txn, entry).await?;
    active_model.id = Set(transaction_id);
    let result = active_model.update(&txn).await?;
    txn.commit().await?;

    info!(
        "Updated transaction {} for supplier {} (total {})",
        result.id, result.supplier_id, result.total
    );
    Ok(result)
}

/// Retrieves a transaction by id.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<transaction::Model> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })
}

/// Retrieves all transactions of a supplier, newest first.
pub async fn get_transactions_for_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Vec<transaction::Model>> {
    directory::get_supplier_by_id(db, supplier_id).await?;

    Transaction::find()
        .filter(transaction::Column::SupplierId.eq(supplier_id))
        .order_by_desc(transaction::Column::TradeDate)
        .order_by_desc(transaction::Column::TradeTime)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction. Monthly statements are not adjusted until they are
/// next refreshed.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::TransactionNotFound { id: transaction_id });
    }
    info!("Deleted transaction {}", transaction_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};

    async fn priced_supplier(db: &DatabaseConnection) -> Result<supplier::Model> {
        create_test_company(db, "Phu Rieng").await?;
        set_test_price(db, "Phu Rieng", "2024-05-01").await?;
        create_test_supplier(db, "0901234567", "A1B2C3D4", "Phu Rieng").await
    }

    #[tokio::test]
    async fn test_full_lifecycle_total() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = priced_supplier(&db).await?;
        let clock = test_clock(8, 0, 0);
        let scan = KioskScan::rfid_only("A1B2C3D4");

        let opened = begin_transaction(&db, &clock, "A1B2C3D4", dec("50")).await?;
        assert_eq!(opened.supplier_id, supplier.id);
        assert_eq!(opened.trade_date, test_date());
        assert_eq!(opened.lifecycle_state(), TransactionState::Opened);
        assert_eq!(opened.liquid_price, dec("20000"));
        assert_eq!(opened.coagulum_price, dec("18000"));
        assert_eq!(opened.total, Decimal::ZERO);

        let liquid = record_liquid_weight(&db, &clock, &scan, dec("30")).await?;
        assert_eq!(liquid.id, opened.id);
        assert_eq!(liquid.lifecycle_state(), TransactionState::LiquidRecorded);

        let closed = record_moisture(&db, &clock, &scan, dec("0.30"), dec("0.60")).await?;
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.lifecycle_state(), TransactionState::Closed);
        assert_eq!(closed.total, dec("720000.00"));

        let stored = get_transaction_by_id(&db, opened.id).await?;
        assert_eq!(stored.total, dec("720000.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_price_blocks_opening() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_company(&db, "Phu Rieng").await?;
        set_test_price(&db, "Phu Rieng", "2024-04-30").await?;
        create_test_supplier(&db, "0901234567", "A1B2C3D4", "Phu Rieng").await?;

        let result = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("50")).await;
        assert!(matches!(result, Err(Error::PriceNotSet { .. })));
        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unaffiliated_supplier_cannot_open() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_company(&db, "Phu Rieng").await?;
        set_test_price(&db, "Phu Rieng", "2024-05-01").await?;
        let seed = crate::config::settings::SupplierSeed {
            username: "walk-in".to_string(),
            rfid: Some("00AA00AA".to_string()),
            ..Default::default()
        };
        directory::register_supplier(&db, &seed, test_date()).await?;

        let result = begin_transaction(&db, &test_clock(8, 0, 0), "00AA00AA", dec("10")).await;
        assert!(matches!(result, Err(Error::SupplierUnaffiliated { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_transaction_today_is_updated() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;
        let scan = KioskScan::rfid_only("A1B2C3D4");

        let morning = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("40")).await?;
        let noon = begin_transaction(&db, &test_clock(12, 0, 0), "A1B2C3D4", dec("45")).await?;

        let clock = test_clock(12, 5, 0);
        let updated = record_liquid_weight(&db, &clock, &scan, dec("25")).await?;
        assert_eq!(updated.id, noon.id);

        let untouched = get_transaction_by_id(&db, morning.id).await?;
        assert_eq!(untouched.liquid_weight, Decimal::ZERO);
        assert_eq!(untouched.lifecycle_state(), TransactionState::Opened);
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_id_overrides_latest() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;

        let morning = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("40")).await?;
        begin_transaction(&db, &test_clock(12, 0, 0), "A1B2C3D4", dec("45")).await?;

        let scan = KioskScan {
            rfid: "A1B2C3D4".to_string(),
            transaction_id: Some(morning.id),
        };
        let updated = record_moisture(&db, &test_clock(12, 5, 0), &scan, dec("0.3"), dec("0.6")).await?;
        assert_eq!(updated.id, morning.id);
        assert_eq!(updated.lifecycle_state(), TransactionState::Closed);
        // 40 * 0.6 * 18000
        assert_eq!(updated.total, dec("432000.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_id_of_another_supplier_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;
        create_test_supplier(&db, "0907654321", "B2C3D4E5", "Phu Rieng").await?;
        let clock = test_clock(8, 0, 0);

        let theirs = begin_transaction(&db, &clock, "B2C3D4E5", dec("40")).await?;
        let scan = KioskScan {
            rfid: "A1B2C3D4".to_string(),
            transaction_id: Some(theirs.id),
        };

        let result = record_liquid_weight(&db, &clock, &scan, dec("25")).await;
        assert!(matches!(result, Err(Error::TransactionNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_transaction_today() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;
        begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("40")).await?;

        let tomorrow = crate::core::clock::FixedClock::new(
            test_date().succ_opt().unwrap().and_hms_opt(8, 0, 0).unwrap(),
        );
        let result =
            record_liquid_weight(&db, &tomorrow, &KioskScan::rfid_only("A1B2C3D4"), dec("1")).await;
        assert!(matches!(result, Err(Error::NoOpenTransaction { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_liquid_weight_after_close_keeps_state() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;
        let clock = test_clock(8, 0, 0);
        let scan = KioskScan::rfid_only("A1B2C3D4");

        begin_transaction(&db, &clock, "A1B2C3D4", dec("50")).await?;
        record_moisture(&db, &clock, &scan, dec("0.30"), dec("0.60")).await?;
        let reweighed = record_liquid_weight(&db, &clock, &scan, dec("30")).await?;

        assert_eq!(reweighed.lifecycle_state(), TransactionState::Closed);
        assert_eq!(reweighed.total, dec("720000.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_kiosk_steps_validate_before_touching_store() -> Result<()> {
        // No query results are queued, so any database access would fail
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let clock = test_clock(8, 0, 0);
        let scan = KioskScan::rfid_only("A1B2C3D4");

        let result = begin_transaction(&db, &clock, "A1B2C3D4", Decimal::ZERO).await;
        assert!(matches!(
            result,
            Err(Error::InvalidQuantity {
                field: "coagulum_weight",
                ..
            })
        ));

        let result = record_liquid_weight(&db, &clock, &scan, dec("-3")).await;
        assert!(matches!(
            result,
            Err(Error::InvalidQuantity {
                field: "liquid_weight",
                ..
            })
        ));

        let result = record_moisture(&db, &clock, &scan, dec("0.3"), Decimal::ZERO).await;
        assert!(matches!(
            result,
            Err(Error::InvalidQuantity { field: "drc", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_input_leaves_transaction_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        priced_supplier(&db).await?;
        let clock = test_clock(8, 0, 0);
        let scan = KioskScan::rfid_only("A1B2C3D4");

        let opened = begin_transaction(&db, &clock, "A1B2C3D4", dec("50")).await?;
        assert!(record_liquid_weight(&db, &clock, &scan, Decimal::ZERO).await.is_err());
        assert!(record_moisture(&db, &clock, &scan, dec("-0.3"), dec("0.6")).await.is_err());

        let stored = get_transaction_by_id(&db, opened.id).await?;
        assert_eq!(stored, opened);
        Ok(())
    }

    #[tokio::test]
    async fn test_manual_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = priced_supplier(&db).await?;

        let entry = ManualEntry {
            supplier_id: supplier.id,
            trade_date: test_date(),
            trade_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            company: None,
            liquid_weight: dec("30"),
            tsc: dec("0.30"),
            coagulum_weight: dec("50"),
            drc: dec("0.60"),
        };
        let recorded = record_manual_transaction(&db, &entry).await?;
        assert_eq!(recorded.company, "Phu Rieng");
        assert_eq!(recorded.total, dec("720000.00"));
        assert_eq!(recorded.lifecycle_state(), TransactionState::Closed);

        let unpriced = ManualEntry {
            trade_date: test_date().pred_opt().unwrap(),
            ..entry.clone()
        };
        let result = record_manual_transaction(&db, &unpriced).await;
        assert!(matches!(result, Err(Error::UnpricedTradeDate { .. })));

        let unknown = ManualEntry {
            supplier_id: 9999,
            ..entry
        };
        let result = record_manual_transaction(&db, &unknown).await;
        assert!(matches!(result, Err(Error::UnknownSupplier { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_reprices_and_closes() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = priced_supplier(&db).await?;
        set_test_price(&db, "Phu Rieng", "2024-04-30").await?;
        let opened = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("50")).await?;

        let entry = ManualEntry {
            supplier_id: supplier.id,
            trade_date: test_date().pred_opt().unwrap(),
            trade_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            company: None,
            liquid_weight: dec("30"),
            tsc: dec("0.30"),
            coagulum_weight: dec("40"),
            drc: dec("0.50"),
        };
        let updated = update_transaction(&db, opened.id, &entry).await?;
        assert_eq!(updated.id, opened.id);
        assert_eq!(updated.trade_date, entry.trade_date);
        assert_eq!(updated.lifecycle_state(), TransactionState::Closed);
        // 30 * 0.3 * 20000 + 40 * 0.5 * 18000
        assert_eq!(updated.total, dec("540000.00"));
        assert_eq!(get_transaction_by_id(&db, opened.id).await?, updated);
        assert_eq!(Transaction::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_transaction_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = priced_supplier(&db).await?;
        let opened = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("50")).await?;

        let entry = ManualEntry {
            supplier_id: supplier.id,
            trade_date: test_date(),
            trade_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            company: None,
            liquid_weight: dec("30"),
            tsc: dec("0.30"),
            coagulum_weight: dec("50"),
            drc: dec("0.60"),
        };

        let unpriced = ManualEntry {
            trade_date: test_date().pred_opt().unwrap(),
            ..entry.clone()
        };
        assert!(matches!(
            update_transaction(&db, opened.id, &unpriced).await,
            Err(Error::UnpricedTradeDate { .. })
        ));

        let negative = ManualEntry {
            drc: dec("-0.6"),
            ..entry.clone()
        };
        assert!(matches!(
            update_transaction(&db, opened.id, &negative).await,
            Err(Error::InvalidQuantity { field: "drc", .. })
        ));

        assert!(matches!(
            update_transaction(&db, 9999, &entry).await,
            Err(Error::TransactionNotFound { id: 9999 })
        ));

        assert_eq!(get_transaction_by_id(&db, opened.id).await?, opened);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = priced_supplier(&db).await?;

        let first = begin_transaction(&db, &test_clock(8, 0, 0), "A1B2C3D4", dec("40")).await?;
        let second = begin_transaction(&db, &test_clock(9, 0, 0), "A1B2C3D4", dec("45")).await?;

        let listed = get_transactions_for_supplier(&db, supplier.id).await?;
        let ids: Vec<i64> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        delete_transaction(&db, first.id).await?;
        assert!(matches!(
            delete_transaction(&db, first.id).await,
            Err(Error::TransactionNotFound { .. })
        ));
        assert_eq!(get_transactions_for_supplier(&db, supplier.id).await?.len(), 1);

        assert!(matches!(
            get_transactions_for_supplier(&db, 9999).await,
            Err(Error::UnknownSupplier { .. })
        ));
        Ok(())
    }
}
