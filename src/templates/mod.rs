// src/templates/mod.rs
//! Template-mapping engine: field catalog, mapping store, value resolver
//! and exporter, plus the Bevy glue that loads templates from Google Sheets.

pub mod definitions;
pub mod error;
pub mod events;
pub mod exporter;
pub mod field_catalog;
pub mod grid;
pub mod mapping_store;
pub mod plugin;
pub mod resolver;
pub mod resources;
pub mod sheets_api;
pub mod systems;
pub mod workbook;

pub use plugin::TemplatesPlugin;
