// src/ui/common.rs
use bevy_egui::egui;
use std::collections::HashMap;
use std::hash::Hash;

use crate::sow::rich_text::{from_plain, to_plain};

/// Returns the plain-text buffer to edit for `markup`.
///
/// An existing buffer is kept while it still produces `markup`, so in-progress
/// whitespace survives between frames. Otherwise it is rebuilt from the markup.
pub fn plain_text_buffer<'a, K: Hash + Eq>(
    buffers: &'a mut HashMap<K, String>,
    key: K,
    markup: &str,
) -> &'a mut String {
    let buffer = buffers.entry(key).or_insert_with(|| to_plain(markup));
    if from_plain(buffer) != markup {
        *buffer = to_plain(markup);
    }
    buffer
}

/// Multi-line editor for a rich-text field. Writes back markup on change.
pub fn edit_rich_text<K: Hash + Eq>(
    ui: &mut egui::Ui,
    buffers: &mut HashMap<K, String>,
    key: K,
    markup: &mut String,
    width: f32,
) -> egui::Response {
    let buffer = plain_text_buffer(buffers, key, markup);
    let response = ui.add(
        egui::TextEdit::multiline(buffer)
            .desired_rows(2)
            .desired_width(width),
    );
    if response.changed() {
        *markup = from_plain(buffer);
    }
    response
}

/// Outline for a drop target under the pointer: green when it accepts the
/// drop, red otherwise.
pub fn paint_drop_highlight(ui: &mut egui::Ui, rect: egui::Rect, droppable: bool) {
    let (fill, stroke) = if droppable {
        (
            egui::Color32::from_rgba_premultiplied(60, 200, 60, 40),
            egui::Stroke::new(2.0, egui::Color32::from_rgb(60, 200, 60)),
        )
    } else {
        ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::NotAllowed);
        (
            egui::Color32::from_rgba_premultiplied(200, 60, 60, 40),
            egui::Stroke::new(2.0, egui::Color32::from_rgb(200, 60, 60)),
        )
    };
    ui.ctx().debug_painter().rect(
        rect,
        egui::CornerRadius::same(2),
        fill,
        stroke,
        egui::StrokeKind::Outside,
    );
}

/// Small label that follows the cursor while something is dragged.
pub fn render_drag_preview(ctx: &egui::Context, id: egui::Id, text: &str) {
    let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) else {
        return;
    };
    egui::Area::new(id.with("drag_preview"))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .current_pos(pos + egui::vec2(12.0, 12.0))
        .movable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(text);
            });
        });
}

/// egui colour for a packed `0xRRGGBB` value.
pub fn rgb_color(rgb: u32) -> egui::Color32 {
    egui::Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_built_from_markup() {
        let mut buffers = HashMap::new();
        let buffer = plain_text_buffer(&mut buffers, 1, "<p>Build</p><p>API</p>");
        assert_eq!(buffer, "Build\nAPI");
    }

    #[test]
    fn test_buffer_kept_while_consistent() {
        let mut buffers = HashMap::new();
        buffers.insert(1, "Build".to_string());
        let markup = from_plain("Build");
        assert_eq!(plain_text_buffer(&mut buffers, 1, &markup), "Build");
    }

    #[test]
    fn test_buffer_rebuilt_after_external_change() {
        let mut buffers = HashMap::new();
        buffers.insert(1, "old".to_string());
        assert_eq!(plain_text_buffer(&mut buffers, 1, "<p>new</p>"), "new");
    }

    #[test]
    fn test_rgb_color() {
        assert_eq!(rgb_color(0x10_20_30), egui::Color32::from_rgb(0x10, 0x20, 0x30));
    }
}
