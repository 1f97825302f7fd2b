// LogDeck - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file writes.
// Dependencies: standard library, directories, toml, core value types.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
