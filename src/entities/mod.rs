//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod company;
pub mod price_entry;
pub mod statement;
pub mod supplier;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use price_entry::{
    Column as PriceEntryColumn, Entity as PriceEntry, Model as PriceEntryModel,
};
pub use statement::{Column as StatementColumn, Entity as Statement, Model as StatementModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
    TransactionState,
};
