//! Monthly statement entity - Per-supplier, per-month delivery and payment totals.
//!
//! Unique on `(supplier_id, month)`; the aggregation in `core::statement`
//! upserts by that key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly statement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_statements")]
pub struct Model {
    /// Unique identifier for the statement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier the statement is for
    pub supplier_id: i64,
    /// Calendar month in `YYYY-MM` form
    pub month: String,
    /// Sum of liquid latex weights delivered in the month
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_liquid_weight: Decimal,
    /// Sum of coagulum weights delivered in the month
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_coagulum_weight: Decimal,
    /// Sum of settlement totals payable for the month
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_amount: Decimal,
    /// When the aggregate was last recomputed
    pub updated_at: DateTime,
}

/// Defines relationships between Statement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each statement belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
