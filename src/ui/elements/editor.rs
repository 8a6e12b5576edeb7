// src/ui/elements/editor.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::popups::show_delete_confirm_popup;
use super::settings_view::{show_settings_view, SettingsViewContext};
use super::sow_view::show_sow_view;
use super::state::{AppView, EditorWindowState};
use super::top_panel::show_top_panel;
use crate::settings::AppSettings;
use crate::sow::events::{
    AddRowRequest, RequestApplyImport, RequestDeleteSelectedRows, RequestDuplicateSelectedRows,
    RequestExcelImport, RequestMoveRow, RequestSaveColumnMapping, RequestSowExport, SelectAllRows,
    ToggleRowSelection,
};
use crate::sow::resources::{ImportSession, SowDocument};
use crate::templates::events::{
    RequestApplyTemplate, RequestCreateMapping, RequestRemoveMapping, RequestResetMappings,
    RequestTemplateExport, RequestTemplateFetch,
};
use crate::templates::resources::{CommittedTemplate, MappingSession, TemplateGridState};
use crate::templates::systems::seed_session_from_committed;
use crate::ui::UiFeedbackState;

#[derive(SystemParam)]
pub struct SowEventWriters<'w> {
    pub add_row: EventWriter<'w, AddRowRequest>,
    pub toggle_selection: EventWriter<'w, ToggleRowSelection>,
    pub select_all: EventWriter<'w, SelectAllRows>,
    pub delete_rows: EventWriter<'w, RequestDeleteSelectedRows>,
    pub duplicate_rows: EventWriter<'w, RequestDuplicateSelectedRows>,
    pub move_row: EventWriter<'w, RequestMoveRow>,
    pub export_sow: EventWriter<'w, RequestSowExport>,
    pub import_excel: EventWriter<'w, RequestExcelImport>,
    pub apply_import: EventWriter<'w, RequestApplyImport>,
    pub save_mapping: EventWriter<'w, RequestSaveColumnMapping>,
}

#[derive(SystemParam)]
pub struct TemplateEventWriters<'w> {
    pub fetch: EventWriter<'w, RequestTemplateFetch>,
    pub create: EventWriter<'w, RequestCreateMapping>,
    pub remove: EventWriter<'w, RequestRemoveMapping>,
    pub reset: EventWriter<'w, RequestResetMappings>,
    pub apply: EventWriter<'w, RequestApplyTemplate>,
    pub export: EventWriter<'w, RequestTemplateExport>,
}

#[allow(clippy::too_many_arguments)]
pub fn sow_editor_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<EditorWindowState>,
    mut document: ResMut<SowDocument>,
    mut import: ResMut<ImportSession>,
    mut session: ResMut<MappingSession>,
    grid: Res<TemplateGridState>,
    committed: Res<CommittedTemplate>,
    settings: Res<AppSettings>,
    ui_feedback: Res<UiFeedbackState>,
    mut sow_writers: SowEventWriters,
    mut template_writers: TemplateEventWriters,
) {
    let ctx = contexts.ctx_mut();
    let previous_view = state.view;

    show_delete_confirm_popup(
        ctx,
        &mut state,
        document.selected_rows.len(),
        &mut sow_writers.delete_rows,
    );

    egui::CentralPanel::default().show(ctx, |ui| {
        show_top_panel(ui, &mut state, &ui_feedback);
        match state.view {
            AppView::Sow => show_sow_view(
                ui,
                &mut state,
                &mut document,
                &mut sow_writers,
                &mut template_writers,
            ),
            AppView::Settings => show_settings_view(
                ui,
                &mut state,
                SettingsViewContext {
                    grid: &grid,
                    session: &session,
                    import: &mut import,
                    settings: &settings,
                },
                &mut sow_writers,
                &mut template_writers,
            ),
        }
    });

    // Entering Settings resumes editing from the applied mappings.
    if previous_view != AppView::Settings && state.view == AppView::Settings {
        seed_session_from_committed(&mut session.store, &committed);
    }
}
