// src/sow/systems/mod.rs
pub mod io;
pub mod logic;
