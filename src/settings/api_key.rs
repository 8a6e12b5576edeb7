// src/settings/api_key.rs
//! Google Sheets API key lookup: environment first, then the OS keyring.

use bevy::log::{error, info};

pub const API_KEY_ENV_VAR: &str = "GOOGLE_SHEETS_API_KEY";
const KEYRING_SERVICE_NAME: &str = "sow_builder";
const KEYRING_API_KEY_USERNAME: &str = "google_sheets_api_key";

pub fn load_api_key() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            return Some(key.trim().to_string());
        }
    }
    match keyring::Entry::new(KEYRING_SERVICE_NAME, KEYRING_API_KEY_USERNAME) {
        Ok(entry) => match entry.get_password() {
            Ok(key) if !key.is_empty() => Some(key),
            Ok(_) | Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                error!("ApiKey: Error reading keyring: {}", e);
                None
            }
        },
        Err(e) => {
            error!("ApiKey: Error creating keyring entry: {}", e);
            None
        }
    }
}

pub fn store_api_key(key: &str) -> Result<(), keyring::Error> {
    let entry = keyring::Entry::new(KEYRING_SERVICE_NAME, KEYRING_API_KEY_USERNAME)?;
    if key.is_empty() {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => return Err(e),
        }
        info!("ApiKey: Cleared key from keyring.");
    } else {
        entry.set_password(key)?;
        info!("ApiKey: Stored key in keyring.");
    }
    Ok(())
}

/// Short status text for the settings view.
pub fn api_key_status() -> &'static str {
    if load_api_key().is_some() {
        "Key Set"
    } else {
        "No Key Set"
    }
}
