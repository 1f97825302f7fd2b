// LogDeck - ui/mod.rs
//
// UI layer: plain-text presentation for the terminal.
// Dependencies: core (read-only models and table projection).
// Must NOT depend on: platform, direct I/O. Renderers return strings.

pub mod detail;
pub mod summary;
pub mod table;
