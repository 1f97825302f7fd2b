// LogDeck - core/search.rs
//
// Free-text search: case-insensitive substring containment across a fixed
// set of record fields. No tokenisation, no weighting.

use crate::core::model::LogRecord;

/// Returns true if `term` is empty or appears (case-insensitively) in the
/// source address, path, method, status code, agent string, or content
/// category of `record`.
pub fn matches_search(term: &str, record: &LogRecord) -> bool {
    if term.is_empty() {
        return true;
    }
    matches_search_lower(&term.to_lowercase(), record)
}

/// Same as [`matches_search`] with the term already lowercased, so a pass
/// over many records lowercases it once.
pub fn matches_search_lower(term_lower: &str, record: &LogRecord) -> bool {
    if term_lower.is_empty() {
        return true;
    }
    record.source_address.to_lowercase().contains(term_lower)
        || record.path.to_lowercase().contains(term_lower)
        || record.method.to_lowercase().contains(term_lower)
        || record.status_code.to_string().contains(term_lower)
        || record.agent_string.to_lowercase().contains(term_lower)
        || record.content_category.to_lowercase().contains(term_lower)
}
