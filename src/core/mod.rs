//! Core business logic, independent of the HTTP layer.

pub mod clock;
pub mod decommission;
pub mod directory;
pub mod pricing;
pub mod settlement;
pub mod statement;
pub mod transaction;
