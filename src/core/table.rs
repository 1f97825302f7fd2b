// LogDeck - core/table.rs
//
// Table projection of one page: visible columns only, display-formatted cells.
// Column visibility and display zone affect this module alone; the query
// pipeline never sees them.

use crate::core::model::{DisplayZone, Field, LogRecord};
use crate::core::query::ColumnSet;
use crate::util::constants::{BYTE_UNITS, DISPLAY_TIMESTAMP_FORMAT, EMPTY_REFERER_PLACEHOLDER};

/// Headers and cell strings for the visible columns of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub fields: Vec<Field>,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build<'a, I>(rows: I, columns: &ColumnSet, zone: DisplayZone) -> Self
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        let fields = columns.visible();
        let headers: Vec<&'static str> = fields.iter().map(|f| f.label()).collect();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| format_cell(*field, record, zone))
                    .collect()
            })
            .collect();
        Self {
            fields,
            headers,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display string for one cell.
pub fn format_cell(field: Field, record: &LogRecord, zone: DisplayZone) -> String {
    match field {
        Field::Timestamp => zone
            .to_display(&record.occurred_at)
            .format(DISPLAY_TIMESTAMP_FORMAT)
            .to_string(),
        Field::Size => format_bytes(record.byte_size),
        Field::Referer if record.referer_url.is_empty() => EMPTY_REFERER_PLACEHOLDER.to_string(),
        _ => field.raw_value(record).into_owned(),
    }
}

/// Human-readable byte size, 1024-based with up to two decimals.
///
/// `0 B`, `512 B`, `1 KB`, `1.5 KB`, `8 MB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        return format!("{bytes} {}", BYTE_UNITS[0]);
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", BYTE_UNITS[unit])
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate_cell(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('\u{2026}');
    out
}
