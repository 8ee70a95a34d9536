//! Account entity - Login identities for admins, company managers and suppliers.
//!
//! Only the identity half of an account lives here; credentials and token
//! issuance are handled outside this service.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role an account plays, stored as its lowercase name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// System administrator
    Admin,
    /// Company manager (owns a company's price sheet)
    Manager,
    /// Latex supplier (delivers at the weighing station)
    Supplier,
}

impl AccountRole {
    /// Column value for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Supplier => "supplier",
        }
    }
}

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name; suppliers usually log in with their phone number
    #[sea_orm(unique)]
    pub username: String,
    /// One of `"admin"`, `"manager"`, `"supplier"`
    pub role: String,
    /// Day the account was created
    pub created_on: Date,
}

/// Accounts are referenced by companies and suppliers, never the other way round
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
