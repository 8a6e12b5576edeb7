// src/sow/import.rs
//! Excel import: validate a file, read its first sheet, map columns onto
//! SOW row fields.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use super::definitions::{RowData, RowField};

pub const MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;
pub const PREVIEW_ROWS: usize = 5;
const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Please upload an Excel file (.xlsx or .xls), got '{0}'")]
    InvalidFileType(String),
    #[error("File size must be less than 5MB ({0} bytes)")]
    FileTooLarge(u64),
    #[error("Error reading Excel file: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

pub fn validate_file(file_name: &str, size: u64) -> Result<(), ImportError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ImportError::InvalidFileType(file_name.to_string()));
    }
    if size > MAX_IMPORT_BYTES {
        return Err(ImportError::FileTooLarge(size));
    }
    Ok(())
}

/// First sheet of an imported workbook: header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ImportedTable {
    pub fn preview(&self) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(PREVIEW_ROWS)]
    }

    fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Decodes the first worksheet. Nothing is returned on failure.
pub fn read_workbook(bytes: Vec<u8>) -> Result<ImportedTable, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Parse(e.to_string()))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Parse("workbook contains no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| ImportError::Parse(e.to_string()))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    Ok(ImportedTable {
        headers,
        rows: rows.collect(),
    })
}

/// Header name chosen for each SOW field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub process_and_impact: Option<String>,
    pub components: Option<String>,
    pub assumptions: Option<String>,
    pub hours: Option<String>,
    pub notes: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: RowField) -> Option<&str> {
        match field {
            RowField::ProcessAndImpact => self.process_and_impact.as_deref(),
            RowField::Components => self.components.as_deref(),
            RowField::Assumptions => self.assumptions.as_deref(),
            RowField::Hours => self.hours.as_deref(),
            RowField::Notes => self.notes.as_deref(),
        }
    }

    pub fn set(&mut self, field: RowField, header: Option<String>) {
        let slot = match field {
            RowField::ProcessAndImpact => &mut self.process_and_impact,
            RowField::Components => &mut self.components,
            RowField::Assumptions => &mut self.assumptions,
            RowField::Hours => &mut self.hours,
            RowField::Notes => &mut self.notes,
        };
        *slot = header;
    }

    /// The field a header is mapped to, if any.
    pub fn field_for(&self, header: &str) -> Option<RowField> {
        RowField::ALL.into_iter().find(|f| self.get(*f) == Some(header))
    }

    /// Notes is optional; the other four must be set.
    pub fn is_valid(&self) -> bool {
        [
            RowField::ProcessAndImpact,
            RowField::Components,
            RowField::Assumptions,
            RowField::Hours,
        ]
        .into_iter()
        .all(|f| self.get(f).is_some_and(|h| !h.is_empty()))
    }
}

/// Builds fresh rows from the imported table. Missing cells become "".
pub fn apply_mapping(table: &ImportedTable, mapping: &ColumnMapping) -> Vec<RowData> {
    let indices: HashMap<RowField, usize> = RowField::ALL
        .into_iter()
        .filter_map(|f| Some((f, table.column_index(mapping.get(f)?)?)))
        .collect();

    table
        .rows
        .iter()
        .map(|cells| {
            let mut row = RowData::default();
            for (field, index) in &indices {
                if let Some(value) = cells.get(*index) {
                    *row.field_mut(*field) = value.clone();
                }
            }
            row
        })
        .collect()
}
