// src/templates/error.rs

use thiserror::Error;

use super::definitions::CellCoordinate;
use super::field_catalog::FieldId;

/// Failures of the mapping engine. All are recoverable and end up as
/// user-facing feedback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Failed to load template: {0}")]
    TemplateFetch(String),
    #[error("Cannot apply template: no cell mappings have been created.")]
    EmptyMappingSet,
    #[error("No cell mappings configured. Apply a template mapping before exporting.")]
    NoMappingsConfigured,
    #[error("No template loaded. Load a template before exporting.")]
    NoTemplateLoaded,
    #[error("Unknown field '{0}'.")]
    UnknownField(String),
    #[error("Cell {0} already has a mapping.")]
    DuplicateTarget(CellCoordinate),
    #[error("Field '{0}' is already mapped.")]
    DuplicateSource(FieldId),
    #[error("Cell {0} is outside the loaded template.")]
    OutOfBounds(CellCoordinate),
    #[error("The applied mappings belong to template '{committed}' but '{loaded}' is loaded. Reload it or apply the mappings again.")]
    TemplateMismatch { committed: String, loaded: String },
    #[error("Please enter a valid Google Sheets URL: {0}")]
    InvalidSheetUrl(String),
    #[error("Spreadsheet encoding failed: {0}")]
    Codec(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<rust_xlsxwriter::XlsxError> for TemplateError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TemplateError::Codec(err.to_string())
    }
}
