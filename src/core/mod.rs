// LogDeck - core/mod.rs
//
// Core business logic layer: the record model and the query pipeline.
// Dependencies: chrono, serde, csv, tracing.
// Must NOT depend on: ui, platform, app.

pub mod export;
pub mod filter;
pub mod import;
pub mod model;
pub mod paginate;
pub mod query;
pub mod sample;
pub mod search;
pub mod sort;
pub mod stats;
pub mod table;
