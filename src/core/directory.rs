//! Identity and company directory.
//!
//! Lookups used by the kiosk flow (supplier by RFID tag), by the price book
//! (company existence) and by back-office operations. Directory records are
//! created from the seed lists in config.toml; there is no account management
//! beyond that.

use crate::{
    config::settings::{CompanySeed, Settings, SupplierSeed},
    entities::{
        Account, Company, Supplier,
        account::{self, AccountRole},
        company, supplier,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Trims a text field and treats blank input as absent.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Finds the supplier carrying an RFID tag.
pub async fn find_supplier_by_rfid<C>(db: &C, rfid: &str) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find()
        .filter(supplier::Column::Rfid.eq(rfid.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`find_supplier_by_rfid`], but an unknown or blank tag is an error.
///
/// # Errors
/// * `EmptyField` if the tag is blank
/// * `SupplierNotFound` if no supplier carries the tag
pub async fn require_supplier_by_rfid<C>(db: &C, rfid: &str) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    if rfid.trim().is_empty() {
        return Err(Error::EmptyField { field: "rfid" });
    }

    find_supplier_by_rfid(db, rfid).await?.ok_or_else(|| {
        warn!("Rejected scan of unregistered RFID tag {}", rfid.trim());
        Error::SupplierNotFound {
            rfid: rfid.trim().to_string(),
        }
    })
}

/// Retrieves a supplier by id.
///
/// # Errors
/// Returns `UnknownSupplier` if no supplier has this id.
pub async fn get_supplier_by_id<C>(db: &C, supplier_id: i64) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownSupplier { supplier_id })
}

/// Finds a login account by username.
pub async fn find_account_by_username<C>(db: &C, username: &str) -> Result<Option<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find()
        .filter(account::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a company by its name.
pub async fn find_company<C>(db: &C, name: &str) -> Result<Option<company::Model>>
where
    C: ConnectionTrait,
{
    Company::find()
        .filter(company::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns true if a company with this name exists.
pub async fn company_exists<C>(db: &C, name: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(find_company(db, name).await?.is_some())
}

async fn create_account<C>(
    db: &C,
    username: &str,
    role: AccountRole,
    created_on: NaiveDate,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    if find_account_by_username(db, username).await?.is_some() {
        return Err(Error::DuplicateAccount {
            username: username.to_string(),
        });
    }

    let account = account::ActiveModel {
        username: Set(username.to_string()),
        role: Set(role.as_str().to_string()),
        created_on: Set(created_on),
        ..Default::default()
    };
    account.insert(db).await.map_err(Into::into)
}

/// Creates a company together with its manager account.
///
/// # Arguments
/// * `seed` - Company name, manager username and contact details
/// * `created_on` - Creation date recorded on the manager account
///
/// # Errors
/// * `EmptyField` if the name or manager username is blank
/// * `DuplicateAccount` if the manager username is taken
pub async fn register_company(
    db: &DatabaseConnection,
    seed: &CompanySeed,
    created_on: NaiveDate,
) -> Result<company::Model> {
    let name = non_blank(Some(seed.name.as_str())).ok_or(Error::EmptyField { field: "name" })?;
    let username = non_blank(Some(seed.manager_username.as_str())).ok_or(Error::EmptyField {
        field: "manager_username",
    })?;

    let txn = db.begin().await?;

    let account = create_account(&txn, &username, AccountRole::Manager, created_on).await?;
    let company = company::ActiveModel {
        name: Set(name),
        account_id: Set(account.id),
        manager_name: Set(non_blank(seed.manager_name.as_deref())),
        phone: Set(non_blank(seed.phone.as_deref())),
        email: Set(non_blank(seed.email.as_deref())),
        ..Default::default()
    };
    let result = company.insert(&txn).await?;

    txn.commit().await?;
    info!("Registered company {} (manager {})", result.name, username);
    Ok(result)
}

/// Creates a supplier together with their login account.
///
/// A blank RFID tag or phone is stored as absent.
///
/// # Errors
/// * `EmptyField` if the username is blank
/// * `UnknownCompany` if the named company does not exist
/// * `DuplicateRfid` if another supplier carries the tag
/// * `DuplicatePhone` if another supplier has the phone number
/// * `DuplicateAccount` if the username is taken
pub async fn register_supplier(
    db: &DatabaseConnection,
    seed: &SupplierSeed,
    created_on: NaiveDate,
) -> Result<supplier::Model> {
    let username =
        non_blank(Some(seed.username.as_str())).ok_or(Error::EmptyField { field: "username" })?;
    let rfid = non_blank(seed.rfid.as_deref());
    let phone = non_blank(seed.phone.as_deref());
    let company = non_blank(seed.company.as_deref());

    let txn = db.begin().await?;

    if let Some(name) = &company {
        if !company_exists(&txn, name).await? {
            return Err(Error::UnknownCompany {
                company: name.clone(),
            });
        }
    }

    if let Some(tag) = &rfid {
        if find_supplier_by_rfid(&txn, tag).await?.is_some() {
            return Err(Error::DuplicateRfid { rfid: tag.clone() });
        }
    }

    if let Some(number) = &phone {
        let taken = Supplier::find()
            .filter(supplier::Column::Phone.eq(number.as_str()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(Error::DuplicatePhone {
                phone: number.clone(),
            });
        }
    }

    let account = create_account(&txn, &username, AccountRole::Supplier, created_on).await?;
    let supplier = supplier::ActiveModel {
        account_id: Set(account.id),
        full_name: Set(non_blank(seed.full_name.as_deref())),
        email: Set(non_blank(seed.email.as_deref())),
        rfid: Set(rfid),
        phone: Set(phone),
        company: Set(company),
        bank_account: Set(non_blank(seed.bank_account.as_deref())),
        bank_name: Set(non_blank(seed.bank_name.as_deref())),
        ..Default::default()
    };
    let result = supplier.insert(&txn).await?;

    txn.commit().await?;
    info!("Registered supplier {} ({})", result.id, username);
    Ok(result)
}

/// Outcome of seeding the directory from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Companies created by this run
    pub companies_created: usize,
    /// Suppliers created by this run
    pub suppliers_created: usize,
    /// Entries that already existed and were left untouched
    pub already_present: usize,
}

/// Creates every configured company and supplier that does not exist yet.
///
/// Companies are matched by name and suppliers by username, so running this
/// at every startup is safe. Companies are seeded first so suppliers can
/// reference them.
pub async fn seed_directory(
    db: &DatabaseConnection,
    settings: &Settings,
    today: NaiveDate,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for seed in &settings.companies {
        if company_exists(db, seed.name.trim()).await? {
            report.already_present += 1;
            continue;
        }
        register_company(db, seed, today).await?;
        report.companies_created += 1;
    }

    for seed in &settings.suppliers {
        if find_account_by_username(db, seed.username.trim())
            .await?
            .is_some()
        {
            report.already_present += 1;
            continue;
        }
        register_supplier(db, seed, today).await?;
        report.suppliers_created += 1;
    }

    Ok(report)
}
