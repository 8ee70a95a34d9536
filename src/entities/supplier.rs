//! Supplier entity - A person who delivers latex at the weighing station.
//!
//! Suppliers are identified at the kiosk by their RFID card. The `company`
//! column holds the company name (not its id), mirroring how price entries and
//! transactions are keyed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login account of the supplier
    #[sea_orm(unique)]
    pub account_id: i64,
    /// Supplier's full name
    pub full_name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// RFID card tag scanned at the kiosk
    #[sea_orm(unique)]
    pub rfid: Option<String>,
    /// Phone number
    #[sea_orm(unique)]
    pub phone: Option<String>,
    /// Name of the affiliated company, None if unaffiliated
    pub company: Option<String>,
    /// Bank account number for payouts
    pub bank_account: Option<String>,
    /// Bank name for payouts
    pub bank_name: Option<String>,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each supplier logs in through one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Each supplier is affiliated with at most one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Company",
        to = "super::company::Column::Name"
    )]
    Company,
    /// One supplier has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One supplier has many monthly statements
    #[sea_orm(has_many = "super::statement::Entity")]
    Statements,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::statement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
