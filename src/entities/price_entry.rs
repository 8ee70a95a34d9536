//! Price entry entity - A company's unit prices for one trading day.
//!
//! `(effective_date, company)` is the natural key; a unique index on it is
//! created alongside the table, and transactions reference it as a composite
//! foreign key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_entries")]
pub struct Model {
    /// Unique identifier, also the tie-break for entries sharing a date
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trading day the prices apply to
    pub effective_date: Date,
    /// Company name owning this price sheet
    pub company: String,
    /// Unit price for liquid latex (per unit of total solid content)
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub liquid_price: Decimal,
    /// Unit price for coagulum (per unit of dry rubber content)
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub coagulum_price: Decimal,
}

/// Defines relationships between `PriceEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price entry belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Company",
        to = "super::company::Column::Name"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
