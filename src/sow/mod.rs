// src/sow/mod.rs
pub mod definitions;
pub mod events;
pub mod import;
pub mod plugin;
pub mod resources;
pub mod rich_text;
pub mod systems;

pub use plugin::SowPlugin;
