// LogDeck - app/mod.rs
//
// Application layer: owns the loaded record set and the query state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod state;
