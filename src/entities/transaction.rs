//! Transaction entity - One delivery event at the weighing station.
//!
//! Each transaction records the supplier, the server date and time it was
//! opened, captured weights and moisture readings, the unit prices snapshotted
//! when it was opened, and the settlement total. `state` tracks which kiosk
//! steps have run; zero-valued fields are never used to infer progress.
//! `(trade_date, company)` references the company's price entry for that day.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a transaction through the kiosk protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Coagulum weighed, prices snapshotted
    Opened,
    /// Liquid latex weighed
    LiquidRecorded,
    /// Moisture readings captured, total final
    Closed,
}

impl TransactionState {
    /// Column value for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::LiquidRecorded => "liquid_recorded",
            Self::Closed => "closed",
        }
    }

    /// Parses a stored column value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "opened" => Some(Self::Opened),
            "liquid_recorded" => Some(Self::LiquidRecorded),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// State after a liquid weight has been recorded. Closed stays closed.
    #[must_use]
    pub const fn after_liquid_weight(self) -> Self {
        match self {
            Self::Opened | Self::LiquidRecorded => Self::LiquidRecorded,
            Self::Closed => Self::Closed,
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier, returned to the kiosk by the opening step
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier who delivered
    pub supplier_id: i64,
    /// Server date the transaction was opened
    pub trade_date: Date,
    /// Server time-of-day the transaction was opened, second precision
    pub trade_time: Time,
    /// Company the supplier sold to
    pub company: String,
    /// Liquid latex weight
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub liquid_weight: Decimal,
    /// Total solid content fraction of the liquid latex
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub tsc: Decimal,
    /// Liquid latex unit price snapshotted at open
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub liquid_price: Decimal,
    /// Coagulum weight
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub coagulum_weight: Decimal,
    /// Dry rubber content fraction of the coagulum
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub drc: Decimal,
    /// Coagulum unit price snapshotted at open
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub coagulum_price: Decimal,
    /// Settlement total payable, rounded to two decimals
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total: Decimal,
    /// One of `"opened"`, `"liquid_recorded"`, `"closed"`
    pub state: String,
}

impl Model {
    /// Decoded lifecycle state; unknown values are treated as opened.
    #[must_use]
    pub fn lifecycle_state(&self) -> TransactionState {
        TransactionState::parse(&self.state).unwrap_or(TransactionState::Opened)
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// Each transaction is priced by its company's entry for the trade date
    #[sea_orm(
        belongs_to = "super::price_entry::Entity",
        from = "(Column::TradeDate, Column::Company)",
        to = "(super::price_entry::Column::EffectiveDate, super::price_entry::Column::Company)"
    )]
    PriceEntry,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::price_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
