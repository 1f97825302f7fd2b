// LogDeck - core/export.rs
//
// CSV and JSON export of the current filtered + sorted view.
// Core layer: writes to any Write trait object; the caller decides where the
// bytes go. Output is a pure function of the records passed in.

use crate::core::model::{Field, LogRecord};
use crate::util::constants::{EXPORT_FILE_STEM, MAX_EXPORT_RECORDS};
use crate::util::error::ExportError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type offered to a download prompt.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Suggested download name, `log_data_<YYYY-MM-DD>.<ext>`.
///
/// The date only appears in the name, never in the content.
pub fn suggested_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{EXPORT_FILE_STEM}_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// The nine CSV header cells in export order.
pub fn csv_header() -> [&'static str; Field::COUNT] {
    let mut header = [""; Field::COUNT];
    for field in Field::all() {
        header[field.index()] = field.export_header();
    }
    header
}

fn check_limit(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count,
            max: MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

/// Export records to CSV.
///
/// Writes the header row then one row per record. Fields containing the
/// delimiter, a quote, or a line break are quoted with inner quotes doubled.
/// `export_path` is used for error context only.
pub fn export_csv<'a, W, I>(records: I, writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer.write_record(csv_header()).map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        count += 1;
        check_limit(count)?;
        let row = (*Field::all()).map(|field| field.raw_value(record));
        csv_writer
            .write_record(row.iter().map(|cell| cell.as_bytes()))
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export records to JSON: a pretty-printed array of full records.
pub fn export_json<'a, W, I>(records: I, writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LogRecord>,
{
    let records: Vec<&LogRecord> = records.into_iter().collect();
    check_limit(records.len())?;

    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, &records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(count = records.len(), path = %export_path.display(), "JSON export written");
    Ok(records.len())
}

/// Export in `format` to the given writer.
pub fn export_to_writer<'a, W, I>(
    format: ExportFormat,
    records: I,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LogRecord>,
{
    match format {
        ExportFormat::Csv => export_csv(records, writer, export_path),
        ExportFormat::Json => export_json(records, writer, export_path),
    }
}

/// Serialise records in `format` to a string.
pub fn export_to_string<'a, I>(format: ExportFormat, records: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut buf = Vec::new();
    let placeholder = Path::new("<memory>");
    export_to_writer(format, records, &mut buf, placeholder)?;
    String::from_utf8(buf).map_err(|e| ExportError::Encoding { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_record(path: &str, agent: &str) -> LogRecord {
        LogRecord {
            source_address: "192.168.1.1".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 10, 8, 0, 0).unwrap(),
            method: "GET".to_string(),
            path: path.to_string(),
            status_code: 200,
            byte_size: 1024,
            agent_string: agent.to_string(),
            referer_url: "https://google.com".to_string(),
            content_category: "html".to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let records = vec![make_record("/index.html", "Mozilla/5.0")];
        let output = export_to_string(ExportFormat::Csv, &records).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("Timestamp,IP,Method,Path,Status,Size,User Agent,Referer,File Type")
        );
        assert_eq!(
            lines.next(),
            Some("2023-04-10T08:00:00.000Z,192.168.1.1,GET,/index.html,200,1024,Mozilla/5.0,https://google.com,html")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let records = vec![make_record("/search?q=a,b&t=\"x\"", "Agent, \"quoted\"")];
        let output = export_to_string(ExportFormat::Csv, &records).unwrap();
        assert!(output.contains("\"/search?q=a,b&t=\"\"x\"\"\""), "{output}");
        assert!(output.contains("\"Agent, \"\"quoted\"\"\""), "{output}");
    }

    #[test]
    fn test_csv_export_counts_records() {
        let records = vec![make_record("/a", "x"), make_record("/b", "y")];
        let mut buf = Vec::new();
        let count = export_csv(&records, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_json_export_is_pretty_array() {
        let records = vec![make_record("/a", "Mozilla/5.0")];
        let output = export_to_string(ExportFormat::Json, &records).unwrap();
        assert!(output.starts_with("[\n  {\n    \"ip\": \"192.168.1.1\""), "{output}");
        assert!(output.contains("\"timestamp\": \"2023-04-10T08:00:00.000Z\""));
        let parsed: Vec<LogRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_exports_are_deterministic() {
        let records = vec![make_record("/a", "x"), make_record("/b, c", "y")];
        for format in [ExportFormat::Csv, ExportFormat::Json] {
            let first = export_to_string(format, &records).unwrap();
            let second = export_to_string(format, &records).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_empty_view_exports_header_only() {
        let records: Vec<LogRecord> = Vec::new();
        let csv = export_to_string(ExportFormat::Csv, &records).unwrap();
        assert_eq!(csv.lines().count(), 1);
        let json = export_to_string(ExportFormat::Json, &records).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_suggested_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(suggested_filename(ExportFormat::Csv, date), "log_data_2024-02-29.csv");
        assert_eq!(suggested_filename(ExportFormat::Json, date), "log_data_2024-02-29.json");
    }
}
