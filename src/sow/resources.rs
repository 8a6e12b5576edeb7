// src/sow/resources.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::definitions::FormState;
use super::import::{ColumnMapping, ImportedTable};

/// The live SOW form plus the row selection of the editor.
#[derive(Resource, Debug, Default)]
pub struct SowDocument {
    pub form: FormState,
    pub selected_rows: BTreeSet<usize>,
}

impl SowDocument {
    pub fn all_selected(&self) -> bool {
        !self.form.rows.is_empty() && self.selected_rows.len() == self.form.rows.len()
    }
}

/// State of the Excel import flow in the Settings view.
#[derive(Resource, Debug, Default)]
pub struct ImportSession {
    pub file_name: Option<String>,
    pub table: Option<ImportedTable>,
    pub mapping: ColumnMapping,
    pub last_error: Option<String>,
}
