//! Company decommissioning.
//!
//! Removing a company removes everything that references it. Child rows go first
//! so every foreign key still resolves at each step; the order is the
//! [`DECOMMISSION_PLAN`] below. Transactions priced by the company are deleted even
//! when their supplier belongs elsewhere; the monthly statements those suppliers
//! already had for the affected months are refreshed afterwards. The whole call runs
//! in one database transaction, so a failure at any step leaves every named company
//! intact.

use crate::{
    core::{clock::Clock, directory, statement as statements},
    entities::{Account, Company, PriceEntry, Statement, Supplier, Transaction},
    entities::{account, company, price_entry, statement, supplier, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Condition, DatabaseTransaction, QuerySelect, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// One deletion in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    /// Transactions of the company's suppliers or priced by the company
    SupplierTransactions,
    /// Monthly statements of the company's suppliers
    SupplierStatements,
    /// The suppliers themselves
    Suppliers,
    /// Login accounts of the suppliers
    SupplierAccounts,
    /// The company's price sheet
    PriceEntries,
    /// The company (manager) record
    Company,
    /// The manager's login account
    ManagerAccount,
}

/// Deletion order, children before parents.
pub const DECOMMISSION_PLAN: [CascadeStep; 7] = [
    CascadeStep::SupplierTransactions,
    CascadeStep::SupplierStatements,
    CascadeStep::Suppliers,
    CascadeStep::SupplierAccounts,
    CascadeStep::PriceEntries,
    CascadeStep::Company,
    CascadeStep::ManagerAccount,
];

/// Rows removed by a decommission call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecommissionReport {
    /// Companies that were removed
    pub decommissioned: Vec<String>,
    /// Names that matched no company
    pub skipped: Vec<String>,
    /// Transactions deleted
    pub transactions: u64,
    /// Monthly statements deleted
    pub statements: u64,
    /// Suppliers deleted
    pub suppliers: u64,
    /// Price entries deleted
    pub price_entries: u64,
    /// Login accounts deleted (suppliers and managers)
    pub accounts: u64,
    /// Statements of other companies' suppliers recomputed
    pub statements_refreshed: u64,
}

/// Ids collected for one company before the cascade runs.
struct CompanyScope {
    company: company::Model,
    supplier_ids: Vec<i64>,
    supplier_account_ids: Vec<i64>,
    /// `(supplier_id, month)` of transactions priced by the company but delivered by
    /// suppliers outside it
    outside_months: BTreeSet<(i64, String)>,
}

async fn collect_scope(txn: &DatabaseTransaction, company: company::Model) -> Result<CompanyScope> {
    let suppliers: Vec<(i64, i64)> = Supplier::find()
        .select_only()
        .column(supplier::Column::Id)
        .column(supplier::Column::AccountId)
        .filter(supplier::Column::Company.eq(company.name.as_str()))
        .into_tuple()
        .all(txn)
        .await?;

    let (supplier_ids, supplier_account_ids): (Vec<i64>, Vec<i64>) =
        suppliers.into_iter().unzip();

    let outside: Vec<(i64, NaiveDate)> = Transaction::find()
        .select_only()
        .column(transaction::Column::SupplierId)
        .column(transaction::Column::TradeDate)
        .filter(transaction::Column::Company.eq(company.name.as_str()))
        .filter(transaction::Column::SupplierId.is_not_in(supplier_ids.clone()))
        .into_tuple()
        .all(txn)
        .await?;
    let outside_months = outside
        .into_iter()
        .map(|(supplier_id, date)| (supplier_id, date.format("%Y-%m").to_string()))
        .collect();

    Ok(CompanyScope {
        company,
        supplier_ids,
        supplier_account_ids,
        outside_months,
    })
}

/// Recomputes the existing statements of suppliers outside the company whose
/// transactions were removed with it.
async fn refresh_outside_statements(
    txn: &DatabaseTransaction,
    clock: &dyn Clock,
    scope: &CompanyScope,
    report: &mut DecommissionReport,
) -> Result<()> {
    for (supplier_id, label) in &scope.outside_months {
        let stated = Statement::find()
            .filter(statement::Column::SupplierId.eq(*supplier_id))
            .filter(statement::Column::Month.eq(label.as_str()))
            .one(txn)
            .await?;
        if stated.is_none() {
            continue;
        }
        let month = statements::parse_month(label)?;
        statements::refresh_statement(txn, *supplier_id, &month, clock.now()).await?;
        report.statements_refreshed += 1;
    }
    Ok(())
}

async fn run_step(
    txn: &DatabaseTransaction,
    step: CascadeStep,
    scope: &CompanyScope,
    report: &mut DecommissionReport,
) -> Result<()> {
    let name = scope.company.name.as_str();
    match step {
        CascadeStep::SupplierTransactions => {
            let result = Transaction::delete_many()
                .filter(
                    Condition::any()
                        .add(transaction::Column::SupplierId.is_in(scope.supplier_ids.clone()))
                        .add(transaction::Column::Company.eq(name)),
                )
                .exec(txn)
                .await?;
            report.transactions += result.rows_affected;
        }
        CascadeStep::SupplierStatements => {
            if scope.supplier_ids.is_empty() {
                return Ok(());
            }
            let result = Statement::delete_many()
                .filter(statement::Column::SupplierId.is_in(scope.supplier_ids.clone()))
                .exec(txn)
                .await?;
            report.statements += result.rows_affected;
        }
        CascadeStep::Suppliers => {
            if scope.supplier_ids.is_empty() {
                return Ok(());
            }
            let result = Supplier::delete_many()
                .filter(supplier::Column::Id.is_in(scope.supplier_ids.clone()))
                .exec(txn)
                .await?;
            report.suppliers += result.rows_affected;
        }
        CascadeStep::SupplierAccounts => {
            if scope.supplier_account_ids.is_empty() {
                return Ok(());
            }
            let result = Account::delete_many()
                .filter(account::Column::Id.is_in(scope.supplier_account_ids.clone()))
                .exec(txn)
                .await?;
            report.accounts += result.rows_affected;
        }
        CascadeStep::PriceEntries => {
            let result = PriceEntry::delete_many()
                .filter(price_entry::Column::Company.eq(name))
                .exec(txn)
                .await?;
            report.price_entries += result.rows_affected;
        }
        CascadeStep::Company => {
            Company::delete_by_id(scope.company.id).exec(txn).await?;
        }
        CascadeStep::ManagerAccount => {
            let result = Account::delete_by_id(scope.company.account_id)
                .exec(txn)
                .await?;
            report.accounts += result.rows_affected;
        }
    }
    Ok(())
}

/// Removes the named companies and everything that references them.
///
/// Names that match no company are skipped and listed in the report. Either every
/// named company is removed or, on any failure, none is.
///
/// # Arguments
/// * `clock` - Timestamps statements refreshed by the cascade
/// * `names` - Company names to remove
///
/// # Returns
/// Row counts per kind of record removed
pub async fn decommission_companies(
    db: &DatabaseConnection,
    clock: &dyn Clock,
    names: &[String],
) -> Result<DecommissionReport> {
    let mut report = DecommissionReport::default();

    let txn = db.begin().await?;

    for name in names {
        let Some(company) = directory::find_company(&txn, name.trim()).await? else {
            warn!("Skipping decommission of unknown company {}", name);
            report.skipped.push(name.clone());
            continue;
        };

        let scope = collect_scope(&txn, company).await?;
        for step in DECOMMISSION_PLAN {
            run_step(&txn, step, &scope, &mut report).await?;
        }
        refresh_outside_statements(&txn, clock, &scope, &mut report).await?;
        report.decommissioned.push(scope.company.name);
    }

    txn.commit().await?;
    info!(
        "Decommissioned {} companies ({} transactions, {} suppliers removed)",
        report.decommissioned.len(),
        report.transactions,
        report.suppliers
    );
    Ok(report)
}
