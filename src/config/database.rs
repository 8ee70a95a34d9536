//! Database configuration module for the ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema (including foreign keys declared as `belongs_to` relations) always matches
//! the Rust structs. The composite natural keys that the entity derive cannot express are
//! added as unique indexes right after their tables.

use crate::entities::{
    Account, Company, PriceEntry, Statement, Supplier, Transaction, price_entry, statement,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/latex_ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to database at {}", database_url);

    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates all tables and natural-key indexes if they do not exist yet.
///
/// Parents are created before children so foreign keys resolve: accounts, companies,
/// suppliers, price entries, transactions, monthly statements.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Account).await?;
    create_table(db, &schema, Company).await?;
    create_table(db, &schema, Supplier).await?;
    create_table(db, &schema, PriceEntry).await?;

    // One price sheet per company per day; also the parent key of transactions
    let price_key = Index::create()
        .name("idx_price_entries_date_company")
        .table(PriceEntry)
        .col(price_entry::Column::EffectiveDate)
        .col(price_entry::Column::Company)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&price_key)).await?;

    create_table(db, &schema, Transaction).await?;
    create_table(db, &schema, Statement).await?;

    let statement_key = Index::create()
        .name("idx_monthly_statements_supplier_month")
        .table(Statement)
        .col(statement::Column::SupplierId)
        .col(statement::Column::Month)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&statement_key)).await?;

    Ok(())
}
