// LogDeck - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.
//
// The query engine itself (search, filter, sort, paginate) is infallible;
// only the I/O-facing edges (import, export, configuration) produce errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogDeck operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogDeckError {
    /// Loading a record set failed.
    Import(ImportError),

    /// Export operation failed.
    Export(ExportError),

    /// A command-line argument could not be interpreted.
    InvalidArgument {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for LogDeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::InvalidArgument {
                name,
                value,
                expected,
            } => write!(f, "Invalid value '{value}' for {name}. Expected: {expected}"),
        }
    }
}

impl std::error::Error for LogDeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Import(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::InvalidArgument { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors related to loading a record set from CSV or JSON.
#[derive(Debug)]
pub enum ImportError {
    /// I/O error reading the data file.
    Io { path: PathBuf, source: io::Error },

    /// Data file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The file extension does not identify a supported format.
    UnknownFormat { path: PathBuf },

    /// CSV decoding error (malformed quoting, wrong field count, ...).
    Csv { path: PathBuf, source: csv::Error },

    /// JSON decoding error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The CSV header row does not match the export header.
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A single field value could not be converted.
    InvalidField {
        path: PathBuf,
        line_number: u64,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The data set holds more records than the import limit.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::UnknownFormat { path } => write!(
                f,
                "'{}': cannot determine data format from extension (expected .csv or .json)",
                path.display()
            ),
            Self::Csv { path, source } => {
                write!(f, "'{}': CSV error: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "'{}': JSON error: {source}", path.display())
            }
            Self::HeaderMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "'{}': unexpected CSV header '{found}', expected '{expected}'",
                path.display()
            ),
            Self::InvalidField {
                path,
                line_number,
                field,
                value,
                reason,
            } => write!(
                f,
                "'{}' line {line_number}: invalid {field} '{value}': {reason}",
                path.display()
            ),
            Self::TooManyRecords { count, max } => {
                write!(f, "Data set has {count} records, maximum is {max}")
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ImportError> for LogDeckError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serialised output was not valid UTF-8.
    Encoding {
        source: std::string::FromUtf8Error,
    },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::Encoding { source } => {
                write!(f, "Export produced invalid UTF-8: {source}")
            }
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Encoding { source } => Some(source),
            Self::TooManyRecords { .. } => None,
        }
    }
}

impl From<ExportError> for LogDeckError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for LogDeck results.
pub type Result<T> = std::result::Result<T, LogDeckError>;
