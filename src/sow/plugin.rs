// src/sow/plugin.rs
use bevy::prelude::*;

use super::events::{
    AddRowRequest, OperationFeedback, RequestApplyImport, RequestDeleteSelectedRows,
    RequestDuplicateSelectedRows, RequestExcelImport, RequestMoveRow, RequestSaveColumnMapping,
    RequestSowExport, SelectAllRows, ToggleRowSelection,
};
use super::resources::{ImportSession, SowDocument};
use super::systems;
use crate::settings::{load_app_settings, AppSettings};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SowSystemSet {
    ApplyChanges,
    FileOperations,
}

/// Owns the SOW form, row editing and the Excel import flow.
pub struct SowPlugin;

impl Plugin for SowPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            SowSystemSet::FileOperations.after(SowSystemSet::ApplyChanges),
        );

        app.init_resource::<SowDocument>()
            .init_resource::<ImportSession>()
            .init_resource::<AppSettings>();

        app.add_event::<OperationFeedback>()
            .add_event::<AddRowRequest>()
            .add_event::<ToggleRowSelection>()
            .add_event::<SelectAllRows>()
            .add_event::<RequestDeleteSelectedRows>()
            .add_event::<RequestDuplicateSelectedRows>()
            .add_event::<RequestMoveRow>()
            .add_event::<RequestSowExport>()
            .add_event::<RequestExcelImport>()
            .add_event::<RequestApplyImport>()
            .add_event::<RequestSaveColumnMapping>();

        app.add_systems(Startup, load_app_settings);

        app.add_systems(
            Update,
            (
                systems::logic::handle_add_row_request,
                systems::logic::handle_toggle_row_selection,
                systems::logic::handle_select_all_rows,
                systems::logic::handle_duplicate_selected_rows,
                systems::logic::handle_delete_selected_rows,
                systems::logic::handle_move_row,
            )
                .chain()
                .in_set(SowSystemSet::ApplyChanges),
        );
        app.add_systems(
            Update,
            (
                systems::io::handle_excel_import_request,
                systems::io::handle_apply_import,
                systems::io::handle_save_column_mapping,
                systems::io::handle_sow_export_request,
            )
                .chain()
                .in_set(SowSystemSet::FileOperations),
        );

        info!("SowPlugin initialized.");
    }
}
