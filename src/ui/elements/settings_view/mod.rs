// src/ui/elements/settings_view/mod.rs
use bevy::prelude::*;
use bevy_egui::egui;

mod field_catalog_panel;
mod import_panel;
mod template_grid;

use super::editor::{SowEventWriters, TemplateEventWriters};
use super::state::EditorWindowState;
use crate::settings::api_key::{api_key_status, store_api_key};
use crate::settings::AppSettings;
use crate::sow::resources::ImportSession;
use crate::templates::events::{
    RequestApplyTemplate, RequestResetMappings, RequestTemplateExport, RequestTemplateFetch,
};
use crate::templates::resources::{MappingSession, TemplateGridState};

pub struct SettingsViewContext<'a> {
    pub grid: &'a TemplateGridState,
    pub session: &'a MappingSession,
    pub import: &'a mut ImportSession,
    pub settings: &'a AppSettings,
}

pub fn show_settings_view(
    ui: &mut egui::Ui,
    state: &mut EditorWindowState,
    view: SettingsViewContext,
    sow_writers: &mut SowEventWriters,
    template_writers: &mut TemplateEventWriters,
) {
    if !state.sheet_url_initialized {
        state.sheet_url_input = view.settings.last_sheet_url.clone().unwrap_or_default();
        state.api_key_status = api_key_status().to_string();
        state.sheet_url_initialized = true;
    }

    egui::ScrollArea::vertical()
        .id_salt("settings_scroll")
        .show(ui, |ui| {
            show_api_key_section(ui, state);
            ui.separator();
            show_template_source(ui, state, view.grid, template_writers);
            ui.separator();

            ui.horizontal_top(|ui| {
                ui.vertical(|ui| {
                    ui.set_width(220.0);
                    field_catalog_panel::show_field_catalog(ui, state, &view.session.store);
                });
                ui.separator();
                ui.vertical(|ui| {
                    show_mapping_actions(ui, view.session, template_writers);
                    match &view.grid.snapshot {
                        Some(snapshot) => template_grid::show_template_grid(
                            ui,
                            state,
                            snapshot,
                            &view.session.store,
                            template_writers,
                        ),
                        None if view.grid.loading => {
                            ui.spinner();
                        }
                        None => {
                            ui.label("Load a Google Sheets template to start mapping fields.");
                        }
                    }
                });
            });

            ui.separator();
            import_panel::show_import_panel(ui, view.import, sow_writers);
        });

    // A drag released anywhere outside a drop target is cancelled.
    if state.dragged_field.is_some() && ui.input(|i| i.pointer.any_released()) {
        state.dragged_field = None;
    }
}

fn show_api_key_section(ui: &mut egui::Ui, state: &mut EditorWindowState) {
    ui.horizontal(|ui| {
        ui.label("Google Sheets API Key:");
        ui.add(
            egui::TextEdit::singleline(&mut state.api_key_input)
                .password(true)
                .desired_width(280.0),
        );
        if ui.button("Save Key").clicked() {
            match store_api_key(state.api_key_input.trim()) {
                Ok(()) => {
                    state.api_key_input.clear();
                    state.api_key_status = api_key_status().to_string();
                }
                Err(e) => {
                    error!("Settings: Failed to store API key: {}", e);
                    state.api_key_status = "Keyring Error".to_string();
                }
            }
        }
        ui.label(format!("Status: {}", state.api_key_status));
    });
}

fn show_template_source(
    ui: &mut egui::Ui,
    state: &mut EditorWindowState,
    grid: &TemplateGridState,
    template_writers: &mut TemplateEventWriters,
) {
    ui.horizontal(|ui| {
        ui.label("Template URL:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.sheet_url_input)
                .hint_text("https://docs.google.com/spreadsheets/d/...")
                .desired_width(420.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let label = if grid.snapshot.is_some() { "🔄 Refresh" } else { "Load Template" };
        if ui.button(label).clicked() || submitted {
            template_writers.fetch.write(RequestTemplateFetch {
                input: state.sheet_url_input.clone(),
            });
        }
        if grid.loading {
            ui.spinner();
            ui.label("Loading...");
        }
    });
    if let Some(err) = &grid.last_error {
        ui.colored_label(egui::Color32::RED, err);
    }
    if let Some(snapshot) = &grid.snapshot {
        ui.label(format!("{} / {}", snapshot.title, snapshot.sheet_name));
    }
}

fn show_mapping_actions(
    ui: &mut egui::Ui,
    session: &MappingSession,
    template_writers: &mut TemplateEventWriters,
) {
    ui.horizontal(|ui| {
        ui.label(format!("{} mapping(s)", session.store.len()));
        if ui
            .add_enabled(!session.store.is_empty(), egui::Button::new("Reset"))
            .clicked()
        {
            template_writers.reset.write(RequestResetMappings);
        }
        if ui
            .add_enabled(!session.store.is_empty(), egui::Button::new("Apply Template"))
            .clicked()
        {
            template_writers.apply.write(RequestApplyTemplate);
        }
        if ui.button("Export").clicked() {
            template_writers.export.write(RequestTemplateExport);
        }
    });
}
