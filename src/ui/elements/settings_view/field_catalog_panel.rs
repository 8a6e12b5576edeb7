// src/ui/elements/settings_view/field_catalog_panel.rs
use bevy_egui::egui;

use crate::templates::field_catalog::{entries_in, FieldGroup};
use crate::templates::mapping_store::MappingStore;
use crate::ui::common::render_drag_preview;
use crate::ui::elements::state::EditorWindowState;

/// Draggable catalog entries. A field that is already mapped cannot be
/// dragged again.
pub(super) fn show_field_catalog(ui: &mut egui::Ui, state: &mut EditorWindowState, store: &MappingStore) {
    ui.strong("Fields");
    ui.small("Drag a field onto a template cell.");
    for group in FieldGroup::ALL {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(group.title()).underline());
        for entry in entries_in(group) {
            let field_id = entry.field_id();
            let mapped = store.is_source_mapped(&field_id);
            let text = if mapped {
                egui::RichText::new(format!("✔ {}", entry.label)).weak()
            } else {
                egui::RichText::new(format!("☰ {}", entry.label))
            };
            let sense = if mapped { egui::Sense::hover() } else { egui::Sense::drag() };
            let response = ui.add(egui::Label::new(text).sense(sense));
            if mapped {
                response.on_hover_text("Already mapped");
                continue;
            }
            if response.drag_started_by(egui::PointerButton::Primary) {
                state.dragged_field = Some(field_id.clone());
            }
            if response.hovered() {
                ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::Grab);
            }
        }
    }

    if let Some(field) = &state.dragged_field {
        render_drag_preview(ui.ctx(), egui::Id::new("field_drag"), field.label());
    }
}
