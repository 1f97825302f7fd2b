// LogDeck - core/import.rs
//
// Loads record sets written in the export formats. The CSV reader accepts
// exactly the header the exporter writes, so an exported view can be opened
// again without loss.

use crate::core::export::csv_header;
use crate::core::model::{parse_timestamp, Field, LogRecord};
use crate::util::constants::{MAX_IMPORT_FILE_SIZE, MAX_IMPORT_RECORDS};
use crate::util::error::ImportError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Supported import formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Detect the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ImportFormat::Csv),
            "json" => Some(ImportFormat::Json),
            _ => None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Some(ImportFormat::Csv),
            "json" => Some(ImportFormat::Json),
            _ => None,
        }
    }
}

fn check_limit(count: usize) -> Result<(), ImportError> {
    if count > MAX_IMPORT_RECORDS {
        return Err(ImportError::TooManyRecords {
            count,
            max: MAX_IMPORT_RECORDS,
        });
    }
    Ok(())
}

/// Read records from CSV in the export layout.
///
/// `source` names the input in error messages.
pub fn read_csv<R: Read>(reader: R, source: &Path) -> Result<Vec<LogRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let csv_err = |e: csv::Error| ImportError::Csv {
        path: source.to_path_buf(),
        source: e,
    };

    let expected = csv_header();
    let headers = csv_reader.headers().map_err(csv_err)?;
    if headers.len() != expected.len() || headers.iter().zip(expected).any(|(a, b)| a != b) {
        return Err(ImportError::HeaderMismatch {
            path: source.to_path_buf(),
            expected: expected.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(csv_err)?;
        let line_number = row.position().map(|p| p.line()).unwrap_or(0);
        let cell = |field: Field| row.get(field.index()).unwrap_or("");

        let invalid = |field: Field, reason: String| ImportError::InvalidField {
            path: source.to_path_buf(),
            line_number,
            field: field.export_header(),
            value: cell(field).to_string(),
            reason,
        };

        let occurred_at = parse_timestamp(cell(Field::Timestamp))
            .map_err(|e| invalid(Field::Timestamp, e.to_string()))?;
        let status_code = cell(Field::Status)
            .trim()
            .parse::<u16>()
            .map_err(|e| invalid(Field::Status, e.to_string()))?;
        let byte_size = cell(Field::Size)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(Field::Size, e.to_string()))?;

        records.push(LogRecord {
            source_address: cell(Field::Ip).to_string(),
            occurred_at,
            method: cell(Field::Method).to_string(),
            path: cell(Field::Path).to_string(),
            status_code,
            byte_size,
            agent_string: cell(Field::UserAgent).to_string(),
            referer_url: cell(Field::Referer).to_string(),
            content_category: cell(Field::FileType).to_string(),
        });
        check_limit(records.len())?;
    }

    tracing::debug!(count = records.len(), source = %source.display(), "CSV records read");
    Ok(records)
}

/// Read records from a JSON array in the export layout.
pub fn read_json<R: Read>(reader: R, source: &Path) -> Result<Vec<LogRecord>, ImportError> {
    let records: Vec<LogRecord> =
        serde_json::from_reader(reader).map_err(|e| ImportError::Json {
            path: source.to_path_buf(),
            source: e,
        })?;
    check_limit(records.len())?;
    tracing::debug!(count = records.len(), source = %source.display(), "JSON records read");
    Ok(records)
}

/// Load a record set from disk.
///
/// The format comes from `format` when given, otherwise from the extension.
pub fn load_file(path: &Path, format: Option<ImportFormat>) -> Result<Vec<LogRecord>, ImportError> {
    let format = format
        .or_else(|| ImportFormat::from_path(path))
        .ok_or_else(|| ImportError::UnknownFormat {
            path: path.to_path_buf(),
        })?;

    let io_err = |e: std::io::Error| ImportError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_IMPORT_FILE_SIZE {
        return Err(ImportError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: MAX_IMPORT_FILE_SIZE,
        });
    }

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let records = match format {
        ImportFormat::Csv => read_csv(reader, path)?,
        ImportFormat::Json => read_json(reader, path)?,
    };

    tracing::info!(
        path = %path.display(),
        format = ?format,
        count = records.len(),
        "Record set loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::{export_to_string, ExportFormat};
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn make_record(path: &str, referer: &str) -> LogRecord {
        LogRecord {
            source_address: "203.0.113.9".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 11, 9, 30, 15).unwrap(),
            method: "POST".to_string(),
            path: path.to_string(),
            status_code: 201,
            byte_size: 0,
            agent_string: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            referer_url: referer.to_string(),
            content_category: "api".to_string(),
        }
    }

    #[test]
    fn test_csv_round_trip_preserves_comma_and_quote() {
        let records = vec![
            make_record("/search?q=a,b&t=\"x\"", ""),
            make_record("/plain", "https://example.com/?a=1,2"),
        ];
        let csv = export_to_string(ExportFormat::Csv, &records).unwrap();
        let parsed = read_csv(csv.as_bytes(), Path::new("view.csv")).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_json_round_trip() {
        let records = vec![make_record("/api/items", "")];
        let json = export_to_string(ExportFormat::Json, &records).unwrap();
        let parsed = read_json(json.as_bytes(), Path::new("view.json")).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_wrong_header_rejected() {
        let data = "Time,IP,Method,Path,Status,Size,User Agent,Referer,File Type\n";
        let err = read_csv(data.as_bytes(), Path::new("bad.csv")).unwrap_err();
        assert!(matches!(err, ImportError::HeaderMismatch { .. }), "{err}");
    }

    #[test]
    fn test_invalid_status_reports_line() {
        let data = "Timestamp,IP,Method,Path,Status,Size,User Agent,Referer,File Type\n\
                    2023-04-10T08:00:00.000Z,1.2.3.4,GET,/,200,10,ua,,html\n\
                    2023-04-10T08:01:00.000Z,1.2.3.4,GET,/,abc,10,ua,,html\n";
        match read_csv(data.as_bytes(), Path::new("bad.csv")).unwrap_err() {
            ImportError::InvalidField {
                line_number,
                field,
                value,
                ..
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(field, "Status");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let data = "Timestamp,IP,Method,Path,Status,Size,User Agent,Referer,File Type\n\
                    2023-04-10T08:00:00.000Z,1.2.3.4,GET\n";
        let err = read_csv(data.as_bytes(), Path::new("short.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Csv { .. }), "{err}");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImportFormat::from_path(Path::new("a.CSV")), Some(ImportFormat::Csv));
        assert_eq!(ImportFormat::from_path(Path::new("a.json")), Some(ImportFormat::Json));
        assert_eq!(ImportFormat::from_path(Path::new("a.log")), None);
        assert_eq!(ImportFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_file_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(&path, "x").unwrap();
        let err = load_file(&path, None).unwrap_err();
        assert!(matches!(err, ImportError::UnknownFormat { .. }));
    }

    #[test]
    fn test_load_file_with_explicit_format() {
        let records = vec![make_record("/a", "")];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(export_to_string(ExportFormat::Csv, &records).unwrap().as_bytes())
            .unwrap();
        drop(file);
        let loaded = load_file(&path, Some(ImportFormat::Csv)).unwrap();
        assert_eq!(loaded, records);
    }
}
