// LogDeck - ui/detail.rs
//
// Record detail view: every field with its full value, then the raw record
// as pretty JSON.

use crate::core::model::{format_timestamp, DisplayZone, LogRecord};
use crate::core::table::format_bytes;
use crate::util::constants::{DISPLAY_TIMESTAMP_FORMAT, EMPTY_REFERER_PLACEHOLDER};
use std::fmt::Write;

/// Render the detail view of one record.
pub fn render(record: &LogRecord, zone: DisplayZone) -> String {
    let timestamp = format!(
        "{} ({})",
        zone.to_display(&record.occurred_at).format(DISPLAY_TIMESTAMP_FORMAT),
        format_timestamp(&record.occurred_at)
    );
    let referer = if record.referer_url.is_empty() {
        EMPTY_REFERER_PLACEHOLDER
    } else {
        record.referer_url.as_str()
    };
    let traffic = if record.is_bot() { "Bot" } else { "Human" };

    let rows: [(&str, String); 10] = [
        ("Timestamp", timestamp),
        ("IP Address", record.source_address.clone()),
        ("Method", record.method.clone()),
        ("Status Code", record.status_code.to_string()),
        ("Path", record.path.clone()),
        ("File Type", record.content_category.clone()),
        ("Size", format_bytes(record.byte_size)),
        ("User Agent", record.agent_string.clone()),
        ("Referer", referer.to_string()),
        ("Traffic", traffic.to_string()),
    ];
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;

    let mut out = String::from("Log Entry Details\n\n");
    for (label, value) in &rows {
        let label = format!("{label}:");
        let _ = writeln!(out, "  {label:<label_width$} {value}");
    }

    out.push_str("\nRaw Data\n");
    match serde_json::to_string_pretty(record) {
        Ok(json) => out.push_str(&json),
        Err(e) => {
            tracing::warn!(error = %e, "Could not serialise record for detail view");
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn test_render_lists_fields_and_raw_json() {
        let record = LogRecord {
            source_address: "66.249.66.1".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 10, 9, 0, 0).unwrap(),
            method: "GET".to_string(),
            path: "/robots.txt".to_string(),
            status_code: 200,
            byte_size: 512,
            agent_string: "Googlebot/2.1".to_string(),
            referer_url: String::new(),
            content_category: "txt".to_string(),
        };
        let out = render(&record, FixedOffset::east_opt(0).unwrap().into());
        assert!(out.starts_with("Log Entry Details\n"));
        assert!(out.contains("Timestamp:   2023-04-10 09:00:00 (2023-04-10T09:00:00.000Z)"), "{out}");
        assert!(out.contains("Size:        512 B"), "{out}");
        assert!(out.contains("Referer:     -"), "{out}");
        assert!(out.contains("Traffic:     Bot"), "{out}");
        assert!(out.contains("\"statusCode\": 200"), "{out}");
    }
}
