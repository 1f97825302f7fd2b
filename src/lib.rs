// LogDeck - lib.rs
//
// Library entry point, exposing the query engine and its surrounding layers
// for integration testing and programmatic use. The command-line front end
// lives in `main.rs`.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
