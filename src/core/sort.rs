// LogDeck - core/sort.rs
//
// Field-aware ordering of a filtered view.
//
// Sorting reorders an index list, never the records themselves. The sort is
// stable: records with equal keys keep their incoming relative order in both
// directions.

use crate::core::model::{Field, FieldKind, LogRecord};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "\u{2191}",
            SortDirection::Descending => "\u{2193}",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Parse `asc`/`ascending`/`desc`/`descending`, ignoring case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Field and direction of the current ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for SortKey {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: Field::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

/// Compare two records by `field` in ascending order.
pub fn compare_by(field: Field, a: &LogRecord, b: &LogRecord) -> Ordering {
    match field.kind() {
        FieldKind::Temporal => a.occurred_at.cmp(&b.occurred_at),
        FieldKind::Numeric => match field {
            Field::Size => a.byte_size.cmp(&b.byte_size),
            _ => a.status_code.cmp(&b.status_code),
        },
        FieldKind::Text => {
            let a_value = field.raw_value(a).to_lowercase();
            let b_value = field.raw_value(b).to_lowercase();
            a_value.cmp(&b_value)
        }
    }
}

/// Compare two records under a full sort key.
pub fn compare(key: &SortKey, a: &LogRecord, b: &LogRecord) -> Ordering {
    let ordering = compare_by(key.field, a, b);
    match key.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable in-place sort of `indices` (into `records`) by `key`.
pub fn sort_indices(records: &[LogRecord], indices: &mut [usize], key: &SortKey) {
    if key.field.kind() == FieldKind::Text {
        // Lowercase each key once rather than on every comparison.
        let mut keyed: Vec<(String, usize)> = indices
            .iter()
            .map(|&idx| (key.field.raw_value(&records[idx]).to_lowercase(), idx))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match key.direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        });
        for (slot, (_, idx)) in indices.iter_mut().zip(keyed) {
            *slot = idx;
        }
    } else {
        indices.sort_by(|&a, &b| compare(key, &records[a], &records[b]));
    }

    tracing::trace!(
        field = key.field.key(),
        direction = key.direction.key(),
        count = indices.len(),
        "View sorted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_record(ip: &str, hour: u32, status: u16, size: u64, path: &str) -> LogRecord {
        LogRecord {
            source_address: ip.to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 10, hour, 0, 0).unwrap(),
            method: "GET".to_string(),
            path: path.to_string(),
            status_code: status,
            byte_size: size,
            agent_string: "Mozilla/5.0".to_string(),
            referer_url: String::new(),
            content_category: "html".to_string(),
        }
    }

    fn sorted(records: &[LogRecord], field: Field, direction: SortDirection) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..records.len()).collect();
        sort_indices(records, &mut indices, &SortKey { field, direction });
        indices
    }

    #[test]
    fn test_default_key_is_newest_first() {
        let records = vec![
            make_record("a", 8, 200, 1, "/"),
            make_record("b", 12, 200, 1, "/"),
            make_record("c", 10, 200, 1, "/"),
        ];
        let mut indices = vec![0, 1, 2];
        sort_indices(&records, &mut indices, &SortKey::default());
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_numeric_fields_compare_numerically() {
        let records = vec![
            make_record("a", 8, 404, 1024, "/"),
            make_record("b", 8, 200, 128, "/"),
            make_record("c", 8, 500, 8192, "/"),
        ];
        assert_eq!(sorted(&records, Field::Status, SortDirection::Ascending), vec![1, 0, 2]);
        // 128 < 1024 < 8192 numerically (lexicographic would put 1024 first).
        assert_eq!(sorted(&records, Field::Size, SortDirection::Ascending), vec![1, 0, 2]);
        assert_eq!(sorted(&records, Field::Size, SortDirection::Descending), vec![2, 0, 1]);
    }

    #[test]
    fn test_text_fields_ignore_case() {
        let records = vec![
            make_record("a", 8, 200, 1, "/Zebra"),
            make_record("b", 8, 200, 1, "/apple"),
            make_record("c", 8, 200, 1, "/Mango"),
        ];
        assert_eq!(sorted(&records, Field::Path, SortDirection::Ascending), vec![1, 2, 0]);
        assert_eq!(sorted(&records, Field::Path, SortDirection::Descending), vec![0, 2, 1]);
    }

    #[test]
    fn test_equal_keys_keep_original_order_both_directions() {
        let records = vec![
            make_record("first", 8, 200, 1, "/same"),
            make_record("other", 9, 404, 1, "/other"),
            make_record("second", 10, 200, 1, "/SAME"),
            make_record("third", 11, 200, 1, "/same"),
        ];
        assert_eq!(sorted(&records, Field::Status, SortDirection::Ascending), vec![0, 2, 3, 1]);
        assert_eq!(sorted(&records, Field::Status, SortDirection::Descending), vec![1, 0, 2, 3]);
        assert_eq!(sorted(&records, Field::Path, SortDirection::Ascending), vec![1, 0, 2, 3]);
        assert_eq!(sorted(&records, Field::Path, SortDirection::Descending), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(SortDirection::Ascending.flipped(), SortDirection::Descending);
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("up"), None);
    }
}
