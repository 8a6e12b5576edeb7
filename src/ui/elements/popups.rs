// src/ui/elements/popups.rs
use bevy::prelude::*;
use bevy_egui::egui;

use super::state::EditorWindowState;
use crate::sow::events::RequestDeleteSelectedRows;

pub fn show_delete_confirm_popup(
    ctx: &egui::Context,
    state: &mut EditorWindowState,
    selected_count: usize,
    delete_writer: &mut EventWriter<RequestDeleteSelectedRows>,
) {
    if !state.show_delete_confirm_popup {
        return;
    }

    let mut open = true;
    let mut delete_clicked = false;
    let mut cancel_clicked = false;

    egui::Window::new("Confirm Delete")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(format!("Delete {} selected row(s)?", selected_count));
            ui.colored_label(egui::Color32::YELLOW, "This action cannot be undone.");
            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new("DELETE").fill(egui::Color32::DARK_RED))
                    .clicked()
                {
                    delete_clicked = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_clicked = true;
                }
            });
        });

    if delete_clicked {
        delete_writer.write(RequestDeleteSelectedRows);
    }
    if delete_clicked || cancel_clicked || !open {
        state.show_delete_confirm_popup = false;
    }
}
