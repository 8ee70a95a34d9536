//! Company entity - A latex-buying company and its manager.
//!
//! The company name is the natural key used by suppliers, price entries and
//! transactions. Each company has exactly one manager account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company name, referenced by suppliers and price entries
    #[sea_orm(unique)]
    pub name: String,
    /// Login account of the company's manager
    #[sea_orm(unique)]
    pub account_id: i64,
    /// Manager's full name
    pub manager_name: Option<String>,
    /// Manager's phone number
    pub phone: Option<String>,
    /// Manager's email address
    pub email: Option<String>,
}

/// Defines relationships between Company and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each company is managed through one login account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// One company has many affiliated suppliers
    #[sea_orm(has_many = "super::supplier::Entity")]
    Suppliers,
    /// One company has many daily price entries
    #[sea_orm(has_many = "super::price_entry::Entity")]
    PriceEntries,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::price_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
