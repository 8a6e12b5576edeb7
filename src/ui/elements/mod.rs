// src/ui/elements/mod.rs
pub mod editor;
pub mod popups;
pub mod settings_view;
pub mod sow_view;
pub mod state;
pub mod top_panel;
