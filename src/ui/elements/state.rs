// src/ui/elements/state.rs
use bevy::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::sow::definitions::RowField;
use crate::templates::field_catalog::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Sow,
    Settings,
}

/// UI-only state of the editor window.
#[derive(Resource, Debug, Default)]
pub struct EditorWindowState {
    pub view: AppView,
    pub sheet_url_input: String,
    pub sheet_url_initialized: bool,
    pub api_key_input: String,
    pub api_key_status: String,
    pub show_delete_confirm_popup: bool,
    pub new_out_of_scope_item: String,
    /// Row index grabbed by its drag handle.
    pub dragged_row: Option<usize>,
    /// Catalog field currently being dragged onto the grid.
    pub dragged_field: Option<FieldId>,
    /// Plain-text edit buffers for rich-text cells.
    pub rich_text_buffers: HashMap<(Uuid, RowField), String>,
}
