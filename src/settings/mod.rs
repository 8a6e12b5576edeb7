// src/settings/mod.rs
pub mod api_key;
pub mod io;

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sow::import::ColumnMapping;

/// Column mapping remembered from the last Excel import.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedColumnMapping {
    pub file_name: String,
    pub mapping: ColumnMapping,
    pub last_updated: DateTime<Utc>,
}

#[derive(Resource, Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub last_sheet_url: Option<String>,
    pub column_mapping: Option<SavedColumnMapping>,
}

/// Startup: populate `AppSettings` from disk, falling back to defaults.
pub fn load_app_settings(mut settings: ResMut<AppSettings>) {
    match io::load_settings_from_file::<AppSettings>() {
        Ok(loaded) => *settings = loaded,
        Err(e) => warn!("AppSettings: Using defaults, load failed: {}", e),
    }
}
