//! Unified error type for the ledger.
//!
//! Every variant belongs to one [`ErrorKind`], which is what callers (and the HTTP
//! layer) branch on. Store failures keep their cause for logging but are reported
//! to untrusted callers as an opaque internal failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Caller-visible classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced supplier, transaction or price entry does not exist
    NotFound,
    /// The request itself is malformed or violates a business rule
    InvalidInput,
    /// The request references a record that the store's constraints require but is missing
    ReferentialViolation,
    /// The persistence layer failed; the current operation was rolled back
    StoreFailure,
}

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// No supplier carries the scanned RFID tag
    #[error("No supplier is registered for RFID tag '{rfid}'")]
    SupplierNotFound {
        /// The tag that was scanned
        rfid: String,
    },

    /// Steps 2 and 3 found nothing opened for this supplier today
    #[error("No open transaction today ({date}) for supplier {supplier_id}")]
    NoOpenTransaction {
        /// Supplier whose transaction was looked up
        supplier_id: i64,
        /// The server date used for the lookup
        date: NaiveDate,
    },

    /// No supplier has this id
    #[error("Supplier {supplier_id} not found")]
    UnknownSupplier {
        /// Requested supplier id
        supplier_id: i64,
    },

    /// No transaction with this id exists (or it belongs to another supplier)
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// No price has been set for this company on this exact date
    #[error("No price has been set for company '{company}' on {date}")]
    PriceNotSet {
        /// Company whose price sheet was consulted
        company: String,
        /// Exact date that was looked up
        date: NaiveDate,
    },

    /// The company has no price entries on or before today
    #[error("No price history for company '{company}'")]
    NoPriceHistory {
        /// Company whose price sheet was consulted
        company: String,
    },

    /// A weight, moisture fraction or price was zero, negative or not representable
    #[error("Invalid {field}: {value} ({requirement})")]
    InvalidQuantity {
        /// Name of the offending input
        field: &'static str,
        /// The rejected value as received
        value: String,
        /// What the value must satisfy
        requirement: &'static str,
    },

    /// Liquid latex and coagulum were given the same unit price
    #[error("Liquid latex and coagulum prices must differ (both were {price})")]
    EqualPrices {
        /// The duplicated price
        price: Decimal,
    },

    /// A date string was not in `YYYY-MM-DD` form
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// A statement month was not in `YYYY-MM` form
    #[error("Invalid month '{value}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        value: String,
    },

    /// A required text field was empty
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the empty input
        field: &'static str,
    },

    /// A login account with this username already exists
    #[error("Account '{username}' already exists")]
    DuplicateAccount {
        /// The conflicting username
        username: String,
    },

    /// Another supplier already carries this RFID tag
    #[error("RFID tag '{rfid}' is already assigned")]
    DuplicateRfid {
        /// The conflicting tag
        rfid: String,
    },

    /// Another supplier already has this phone number
    #[error("Phone number '{phone}' is already registered")]
    DuplicatePhone {
        /// The conflicting phone number
        phone: String,
    },

    /// The named company is not in the company directory
    #[error("Company '{company}' does not exist")]
    UnknownCompany {
        /// The unknown company name
        company: String,
    },

    /// The supplier is not affiliated with any company, so no price sheet applies
    #[error("Supplier {supplier_id} is not affiliated with a company")]
    SupplierUnaffiliated {
        /// The unaffiliated supplier
        supplier_id: i64,
    },

    /// A transaction would reference a (date, company) pair with no price entry
    #[error("No price entry exists for company '{company}' on {date}")]
    UnpricedTradeDate {
        /// Company of the transaction
        company: String,
        /// Trade date of the transaction
        date: NaiveDate,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (listener binding, file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classifies this error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SupplierNotFound { .. }
            | Self::UnknownSupplier { .. }
            | Self::NoOpenTransaction { .. }
            | Self::TransactionNotFound { .. }
            | Self::PriceNotSet { .. }
            | Self::NoPriceHistory { .. } => ErrorKind::NotFound,
            Self::InvalidQuantity { .. }
            | Self::EqualPrices { .. }
            | Self::InvalidDate { .. }
            | Self::InvalidMonth { .. }
            | Self::EmptyField { .. }
            | Self::DuplicateAccount { .. }
            | Self::DuplicateRfid { .. }
            | Self::DuplicatePhone { .. } => ErrorKind::InvalidInput,
            Self::UnknownCompany { .. }
            | Self::SupplierUnaffiliated { .. }
            | Self::UnpricedTradeDate { .. } => ErrorKind::ReferentialViolation,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => ErrorKind::StoreFailure,
        }
    }

    /// Stable machine-readable code, distinct per variant.
    ///
    /// Kiosk operators rely on `price_not_set` versus `supplier_not_found` to know
    /// whether to enter today's prices or register the card.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SupplierNotFound { .. } => "supplier_not_found",
            Self::UnknownSupplier { .. } => "unknown_supplier",
            Self::NoOpenTransaction { .. } => "no_open_transaction",
            Self::TransactionNotFound { .. } => "transaction_not_found",
            Self::PriceNotSet { .. } => "price_not_set",
            Self::NoPriceHistory { .. } => "no_price_history",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::EqualPrices { .. } => "equal_prices",
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidMonth { .. } => "invalid_month",
            Self::EmptyField { .. } => "empty_field",
            Self::DuplicateAccount { .. } => "duplicate_account",
            Self::DuplicateRfid { .. } => "duplicate_rfid",
            Self::DuplicatePhone { .. } => "duplicate_phone",
            Self::UnknownCompany { .. } => "unknown_company",
            Self::SupplierUnaffiliated { .. } => "supplier_unaffiliated",
            Self::UnpricedTradeDate { .. } => "unpriced_trade_date",
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => "internal_error",
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds_are_distinct_codes() {
        let supplier = Error::SupplierNotFound {
            rfid: "A1B2".to_string(),
        };
        let price = Error::PriceNotSet {
            company: "X".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
        };

        assert_eq!(supplier.kind(), ErrorKind::NotFound);
        assert_eq!(price.kind(), ErrorKind::NotFound);
        assert_ne!(supplier.code(), price.code());
    }

    #[test]
    fn test_store_failures_share_an_opaque_code() {
        let err = Error::Database(sea_orm::DbErr::Custom("disk full".to_string()));
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn test_referential_violations() {
        let err = Error::UnknownCompany {
            company: "Ghost Co".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ReferentialViolation);
        assert!(err.to_string().contains("Ghost Co"));
    }
}
