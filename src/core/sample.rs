// LogDeck - core/sample.rs
//
// Built-in demonstration data set, used when no input file is given.
// Stored in the JSON export format and parsed through the importer, so the
// sample exercises the same code path as a user-supplied file.

use crate::core::import::read_json;
use crate::core::model::LogRecord;
use crate::util::constants::SAMPLE_SOURCE_NAME;
use crate::util::error::ImportError;
use std::path::Path;

const SAMPLE_JSON: &str = include_str!("../../data/sample_access_log.json");

/// The 38-record sample set, in stored order.
pub fn records() -> Result<Vec<LogRecord>, ImportError> {
    read_json(SAMPLE_JSON.as_bytes(), Path::new(SAMPLE_SOURCE_NAME))
}
