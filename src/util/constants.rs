// LogDeck - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogDeck";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogDeck";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Query defaults
// =============================================================================

/// Rows per page for a fresh query.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Smallest accepted page size. A page size of zero is clamped up to this.
pub const MIN_PAGE_SIZE: usize = 1;

/// Hard upper bound on the configurable page size (prevents configuration
/// mistakes from producing unreadable tables).
pub const MAX_PAGE_SIZE: usize = 1_000;

/// Lowercase agent-string markers that classify a request as bot traffic.
pub const BOT_MARKERS: &[&str] = &["bot", "crawler", "spider"];

// =============================================================================
// Import limits
// =============================================================================

/// Maximum size of an imported data file in bytes.
pub const MAX_IMPORT_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Maximum number of records accepted from a single import.
pub const MAX_IMPORT_RECORDS: usize = 500_000;

/// Source label used in errors for the embedded sample data set.
pub const SAMPLE_SOURCE_NAME: &str = "<built-in sample>";

// =============================================================================
// Display
// =============================================================================

/// chrono format for timestamps in table cells and detail views.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// chrono format for calendar dates in active-filter labels.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Text-table cells longer than this many characters are truncated with an
/// ellipsis. Detail views always show the full value.
pub const MAX_CELL_WIDTH: usize = 40;

/// Placeholder shown for an empty referer.
pub const EMPTY_REFERER_PLACEHOLDER: &str = "-";

/// Units used by the human-readable byte formatter (1024-based).
pub const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// File stem of suggested export file names (`log_data_<date>.<ext>`).
pub const EXPORT_FILE_STEM: &str = "log_data";

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_RECORDS: usize = 5_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
