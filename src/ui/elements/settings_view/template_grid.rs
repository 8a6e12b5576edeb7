// src/ui/elements/settings_view/template_grid.rs
use bevy_egui::egui;
use egui_extras::{Column, TableBuilder};

use crate::templates::definitions::{CellCoordinate, CellFormat, HorizontalAlign, TemplateGridSnapshot};
use crate::templates::events::{RequestCreateMapping, RequestRemoveMapping};
use crate::templates::grid::{display_column_width, display_row_height, DEFAULT_ROW_HEIGHT};
use crate::templates::mapping_store::MappingStore;
use crate::ui::common::{paint_drop_highlight, rgb_color};
use crate::ui::elements::editor::TemplateEventWriters;
use crate::ui::elements::state::EditorWindowState;

const ROW_NUMBER_WIDTH: f32 = 36.0;

/// Read-only preview of the template with drop targets on every cell.
pub(super) fn show_template_grid(
    ui: &mut egui::Ui,
    state: &mut EditorWindowState,
    snapshot: &TemplateGridSnapshot,
    store: &MappingStore,
    template_writers: &mut TemplateEventWriters,
) {
    let pointer_pos = ui.ctx().pointer_interact_pos();
    let released = ui.input(|i| i.pointer.any_released());
    let dragging = state.dragged_field.is_some();
    let mut hovered_target: Option<(CellCoordinate, egui::Rect)> = None;
    let mut remove_target: Option<CellCoordinate> = None;

    egui::ScrollArea::horizontal()
        .id_salt("template_grid_scroll")
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .id_salt("template_grid")
                .striped(false)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(ROW_NUMBER_WIDTH));
            for col in 0..snapshot.column_count() {
                table = table.column(Column::exact(display_column_width(snapshot, col)).clip(true));
            }

            table
                .header(DEFAULT_ROW_HEIGHT, |mut header| {
                    header.col(|_| {});
                    for letter in &snapshot.headers {
                        header.col(|ui| {
                            ui.strong(letter);
                        });
                    }
                })
                .body(|body| {
                    let heights = (0..snapshot.row_count()).map(|r| display_row_height(snapshot, r));
                    body.heterogeneous_rows(heights, |mut row| {
                        let r = row.index();
                        row.col(|ui| {
                            ui.weak((r + 1).to_string());
                        });
                        for c in 0..snapshot.column_count() {
                            let cell = CellCoordinate::new(r, c);
                            let (rect, _) = row.col(|ui| {
                                if let Some(mapping) = store.mapping_at(cell) {
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            egui::RichText::new(mapping.source_id.label())
                                                .background_color(egui::Color32::from_rgb(40, 80, 140))
                                                .color(egui::Color32::WHITE),
                                        );
                                        if ui.small_button("✕").on_hover_text("Remove mapping").clicked() {
                                            remove_target = Some(cell);
                                        }
                                    });
                                } else {
                                    show_cell_value(ui, snapshot, cell);
                                }
                            });
                            if dragging && pointer_pos.is_some_and(|pos| rect.contains(pos)) {
                                hovered_target = Some((cell, rect));
                            }
                        }
                    });
                });
        });

    if let Some(cell) = remove_target {
        template_writers.remove.write(RequestRemoveMapping { target_cell: cell });
    }

    let Some(field) = state.dragged_field.clone() else {
        return;
    };
    if let Some((cell, rect)) = hovered_target {
        let droppable = store.mapping_at(cell).is_none();
        paint_drop_highlight(ui, rect, droppable);
        if released {
            if droppable {
                template_writers.create.write(RequestCreateMapping {
                    source_id: field,
                    target_cell: cell,
                });
            }
            state.dragged_field = None;
        }
    }
}

fn show_cell_value(ui: &mut egui::Ui, snapshot: &TemplateGridSnapshot, cell: CellCoordinate) {
    let value = snapshot.value_at(cell).unwrap_or_default();
    let default_format = CellFormat::default();
    let format = snapshot.format_at(cell).unwrap_or(&default_format);

    if let Some(bg) = format.background_color {
        ui.painter().rect_filled(ui.max_rect(), 0.0, rgb_color(bg));
    }
    let mut text = egui::RichText::new(value);
    if format.bold {
        text = text.strong();
    }
    if format.italic {
        text = text.italics();
    }
    if format.underline {
        text = text.underline();
    }
    if format.strikethrough {
        text = text.strikethrough();
    }
    if let Some(fg) = format.foreground_color {
        text = text.color(rgb_color(fg));
    }
    let layout = match format.horizontal_align {
        HorizontalAlign::Center => egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
        HorizontalAlign::Right => egui::Layout::right_to_left(egui::Align::Center),
        HorizontalAlign::General | HorizontalAlign::Left => egui::Layout::left_to_right(egui::Align::Center),
    };
    ui.with_layout(layout, |ui| {
        ui.add(egui::Label::new(text).wrap_mode(if format.wrap {
            egui::TextWrapMode::Wrap
        } else {
            egui::TextWrapMode::Truncate
        }))
        .on_hover_text(cell.to_string());
    });
}
