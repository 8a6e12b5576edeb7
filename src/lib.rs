// src/lib.rs
pub mod cli;
pub mod settings;
pub mod sow;
pub mod templates;
pub mod ui;
