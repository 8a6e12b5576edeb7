// src/ui/elements/sow_view.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use super::editor::{SowEventWriters, TemplateEventWriters};
use super::state::EditorWindowState;
use crate::sow::definitions::{FormState, RowField};
use crate::sow::events::{
    AddRowRequest, RequestDuplicateSelectedRows, RequestMoveRow, RequestSowExport, SelectAllRows,
    ToggleRowSelection,
};
use crate::sow::resources::SowDocument;
use crate::templates::events::RequestTemplateExport;
use crate::ui::common::{edit_rich_text, paint_drop_highlight, render_drag_preview};

const ROW_HEIGHT: f32 = 64.0;
const TEXT_COLUMN_WIDTH: f32 = 220.0;

pub fn show_sow_view(
    ui: &mut egui::Ui,
    state: &mut EditorWindowState,
    document: &mut SowDocument,
    sow_writers: &mut SowEventWriters,
    template_writers: &mut TemplateEventWriters,
) {
    let has_selection = !document.selected_rows.is_empty();
    ui.horizontal(|ui| {
        if ui.button("➕ Add Row").clicked() {
            sow_writers.add_row.write(AddRowRequest);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Duplicate Selected"))
            .clicked()
        {
            sow_writers.duplicate_rows.write(RequestDuplicateSelectedRows);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("🗑 Delete Selected"))
            .clicked()
        {
            state.show_delete_confirm_popup = true;
        }
        ui.separator();
        if ui.button("Export SOW").clicked() {
            sow_writers.export_sow.write(RequestSowExport);
        }
        if ui
            .button("Export to Template")
            .on_hover_text("Fill the applied template mapping with this SOW")
            .clicked()
        {
            template_writers.export.write(RequestTemplateExport);
        }
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_salt("sow_scroll")
        .show(ui, |ui| {
            show_rows_table(ui, state, document, sow_writers);
            ui.label(format!("Total Hours: {}", document.form.total_hours()));
            ui.separator();
            show_role_hours(ui, &mut document.form);
            ui.separator();
            show_out_of_scope(ui, state, &mut document.form);
        });
}

fn show_rows_table(
    ui: &mut egui::Ui,
    state: &mut EditorWindowState,
    document: &mut SowDocument,
    sow_writers: &mut SowEventWriters,
) {
    let selected = document.selected_rows.clone();
    let all_selected = document.all_selected();
    let pointer_pos = ui.ctx().pointer_interact_pos();
    let released = ui.input(|i| i.pointer.any_released());
    let mut drop_target: Option<(usize, egui::Rect)> = None;

    TableBuilder::new(ui)
        .id_salt("sow_rows")
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Min))
        .column(Column::exact(24.0))
        .column(Column::exact(24.0))
        .columns(Column::initial(TEXT_COLUMN_WIDTH).resizable(true), 3)
        .column(Column::exact(70.0))
        .column(Column::remainder().at_least(TEXT_COLUMN_WIDTH))
        .header(22.0, |mut header| {
            header.col(|ui| {
                let mut check = all_selected;
                if ui.checkbox(&mut check, "").on_hover_text("Select all").changed() {
                    sow_writers.select_all.write(SelectAllRows { selected: check });
                }
            });
            header.col(|_| {});
            for field in RowField::ALL {
                header.col(|ui| {
                    ui.strong(field.header());
                });
            }
        })
        .body(|mut body| {
            for (index, row_data) in document.form.rows.iter_mut().enumerate() {
                body.row(ROW_HEIGHT, |mut row| {
                    let (mut row_rect, _) = row.col(|ui| {
                        let mut check = selected.contains(&index);
                        if ui.checkbox(&mut check, "").changed() {
                            sow_writers.toggle_selection.write(ToggleRowSelection { index });
                        }
                    });
                    row.col(|ui| {
                        let handle = ui
                            .add(egui::Label::new("☰").sense(egui::Sense::drag()))
                            .on_hover_text("Drag to reorder");
                        if handle.drag_started_by(egui::PointerButton::Primary) {
                            state.dragged_row = Some(index);
                        }
                    });
                    for field in RowField::ALL {
                        let (rect, _) = row.col(|ui| {
                            let width = ui.available_width();
                            if field.is_rich_text() {
                                let key = (row_data.id, field);
                                edit_rich_text(ui, &mut state.rich_text_buffers, key, row_data.field_mut(field), width);
                            } else {
                                ui.add(
                                    egui::TextEdit::singleline(row_data.field_mut(field))
                                        .desired_width(width),
                                );
                            }
                        });
                        row_rect = row_rect.union(rect);
                    }
                    if state.dragged_row.is_some() {
                        if let Some(pos) = pointer_pos {
                            if row_rect.contains(pos) {
                                drop_target = Some((index, row_rect));
                            }
                        }
                    }
                });
            }
        });

    if let Some(from) = state.dragged_row {
        if let Some((to, rect)) = drop_target {
            paint_drop_highlight(ui, rect, from != to);
        }
        render_drag_preview(ui.ctx(), egui::Id::new("sow_row_drag"), &format!("Row {}", from + 1));
        if released {
            if let Some((to, _)) = drop_target {
                if to != from {
                    sow_writers.move_row.write(RequestMoveRow { from, to });
                }
            }
            state.dragged_row = None;
        }
    }
}

fn show_role_hours(ui: &mut egui::Ui, form: &mut FormState) {
    ui.strong("Role Hours");
    let hours = &mut form.role_hours;
    egui::Grid::new("role_hours_grid").num_columns(2).show(ui, |ui| {
        for (label, value) in [
            ("SA Hours Per Week", &mut hours.sa),
            ("Consultant Hours Per Week", &mut hours.consultant),
            ("PM Hours Per Week", &mut hours.pm),
            ("EL Hours Per Week", &mut hours.el),
            ("Specialty Resource Hours", &mut hours.specialty),
        ] {
            ui.label(label);
            ui.add(egui::TextEdit::singleline(value).desired_width(80.0));
            ui.end_row();
        }
        ui.label("Hypercare Hours");
        ui.add(egui::TextEdit::singleline(&mut form.hypercare.hours).desired_width(80.0));
        ui.end_row();
        ui.label("Hypercare Weeks");
        ui.add(egui::TextEdit::singleline(&mut form.hypercare.weeks).desired_width(80.0));
        ui.end_row();
    });
}

fn show_out_of_scope(ui: &mut egui::Ui, state: &mut EditorWindowState, form: &mut FormState) {
    ui.strong("Out of Scope Items");
    let mut remove: Option<usize> = None;
    for (index, item) in form.out_of_scope.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(item).desired_width(400.0));
            if ui.small_button("✕").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        form.remove_out_of_scope(index);
    }
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.new_out_of_scope_item)
                .hint_text("New out-of-scope item")
                .desired_width(400.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Add").clicked() || submitted) && !state.new_out_of_scope_item.trim().is_empty() {
            form.add_out_of_scope(std::mem::take(&mut state.new_out_of_scope_item).trim().to_string());
        }
    });
}
