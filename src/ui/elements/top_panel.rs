// src/ui/elements/top_panel.rs
use bevy_egui::egui;

use super::state::{AppView, EditorWindowState};
use crate::ui::UiFeedbackState;

/// View switcher plus the last feedback message.
pub fn show_top_panel(ui: &mut egui::Ui, state: &mut EditorWindowState, feedback: &UiFeedbackState) {
    ui.horizontal(|ui| {
        ui.heading("SOW Builder");
        ui.separator();
        ui.selectable_value(&mut state.view, AppView::Sow, "Statement of Work");
        ui.selectable_value(&mut state.view, AppView::Settings, "Settings");
    });

    if !feedback.last_message.is_empty() {
        let color = if feedback.is_error {
            egui::Color32::RED
        } else {
            ui.style().visuals.text_color()
        };
        ui.colored_label(color, &feedback.last_message);
    }
    ui.separator();
}
