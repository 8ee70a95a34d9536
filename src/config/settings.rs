//! Application settings loaded from config.toml
//!
//! The settings file holds the HTTP bind address, the clock's UTC offset and the
//! directory seed lists. Companies and suppliers listed here are created at startup
//! if they do not exist yet; this is how the directory is populated, since account
//! management is not exposed over HTTP.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Clock settings
    #[serde(default)]
    pub clock: ClockSettings,
    /// Companies to seed, each with its manager account
    #[serde(default)]
    pub companies: Vec<CompanySeed>,
    /// Suppliers to seed, each with its login account
    #[serde(default)]
    pub suppliers: Vec<SupplierSeed>,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Address the API listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Clock settings
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ClockSettings {
    /// Offset of the weighing stations' local time from UTC, in hours
    #[serde(default)]
    pub utc_offset_hours: i32,
}

/// A company and its manager, as listed in config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct CompanySeed {
    /// Company name (natural key)
    pub name: String,
    /// Login name of the manager account
    pub manager_username: String,
    /// Manager's full name
    pub manager_name: Option<String>,
    /// Manager's phone number
    pub phone: Option<String>,
    /// Manager's email
    pub email: Option<String>,
}

/// A supplier, as listed in config.toml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SupplierSeed {
    /// Login name of the supplier account
    pub username: String,
    /// Full name
    pub full_name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// RFID card tag
    pub rfid: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Affiliated company name
    pub company: Option<String>,
    /// Bank account number
    pub bank_account: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `CONFIG_PATH`, or `./config.toml` if unset.
///
/// A missing file is not an error: the defaults are used and nothing is seeded.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!("No configuration file at {}, using defaults", path);
        return Ok(Settings::default());
    }
    load_settings(path)
}
