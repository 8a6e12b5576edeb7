// src/ui/elements/settings_view/import_panel.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::sow::definitions::RowField;
use crate::sow::events::{RequestApplyImport, RequestExcelImport, RequestSaveColumnMapping};
use crate::sow::resources::ImportSession;
use crate::ui::elements::editor::SowEventWriters;

/// Excel import: pick a file, preview it, map columns to SOW fields.
pub(super) fn show_import_panel(ui: &mut egui::Ui, import: &mut ImportSession, sow_writers: &mut SowEventWriters) {
    egui::CollapsingHeader::new("Import from Excel")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Choose File (.xlsx, .xls)").clicked() {
                    sow_writers.import_excel.write(RequestExcelImport);
                }
                if let Some(name) = &import.file_name {
                    ui.label(name);
                }
            });
            if let Some(err) = &import.last_error {
                ui.colored_label(egui::Color32::RED, err);
            }

            let Some(table) = import.table.as_ref() else {
                return;
            };

            ui.add_space(4.0);
            ui.strong("Preview");
            TableBuilder::new(ui)
                .id_salt("import_preview")
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(80.0).clip(true), table.headers.len())
                .header(20.0, |mut header| {
                    for name in &table.headers {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for preview_row in table.preview() {
                        body.row(18.0, |mut row| {
                            for c in 0..table.headers.len() {
                                row.col(|ui| {
                                    ui.label(preview_row.get(c).map(String::as_str).unwrap_or(""));
                                });
                            }
                        });
                    }
                });

            ui.add_space(4.0);
            ui.strong("Column Mapping");
            let headers = table.headers.clone();
            egui::Grid::new("import_column_mapping").num_columns(2).show(ui, |ui| {
                for field in RowField::ALL {
                    let label = if field == RowField::Notes {
                        format!("{} (optional)", field.header())
                    } else {
                        field.header().to_string()
                    };
                    ui.label(label);
                    let mut current = import.mapping.get(field).map(str::to_string);
                    egui::ComboBox::from_id_salt(("import_map", field.header()))
                        .selected_text(current.clone().unwrap_or_else(|| "Select column".to_string()))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut current, None, "None");
                            for header in &headers {
                                ui.selectable_value(&mut current, Some(header.clone()), header);
                            }
                        });
                    if current.as_deref() != import.mapping.get(field) {
                        import.mapping.set(field, current);
                    }
                    ui.end_row();
                }
            });

            ui.horizontal(|ui| {
                let valid = import.mapping.is_valid();
                if ui.add_enabled(valid, egui::Button::new("Import Rows")).clicked() {
                    sow_writers.apply_import.write(RequestApplyImport);
                }
                if ui.add_enabled(valid, egui::Button::new("Save Template Mapping")).clicked() {
                    sow_writers.save_mapping.write(RequestSaveColumnMapping);
                }
                if !valid {
                    ui.weak("Map Process and Impact, Components, Assumptions and Hours.");
                }
            });
        });
}
