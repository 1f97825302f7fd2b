// LogDeck - platform/config.rs
//
// Platform-specific configuration, directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::Field;
pub use crate::core::model::DisplayZone;
use crate::core::query::ColumnSet;
use crate::core::sort::{SortDirection, SortKey};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogDeck configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logdeck/ or %APPDATA%\LogDeck\config\)
    pub config_dir: PathBuf,

    /// Data directory for log files written by `[logging] file`.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Full path of `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Where `[logging] file` writes. Relative paths land in the data
    /// directory; absolute paths are used as given.
    pub fn log_file(&self, configured: &str) -> PathBuf {
        self.data_dir.join(configured)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file can be used
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub view: ViewSection,
    pub time: TimeSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Rows per page.
    pub page_size: Option<i64>,
    /// Initial sort field key (e.g. "timestamp", "status").
    pub sort_field: Option<String>,
    /// "asc" or "desc".
    pub sort_direction: Option<String>,
    /// Visible column keys, in any order.
    pub columns: Option<Vec<String>>,
}

/// `[time]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// "local", "utc", or a fixed "+HH:MM" / "-HH:MM" offset.
    pub utc_offset: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory export files are written to.
    pub directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- View --
    pub page_size: usize,
    pub sort: SortKey,
    pub columns: ColumnSet,

    // -- Time --
    pub display_zone: DisplayZone,

    // -- Export --
    /// Directory for export files; `None` means the current directory.
    pub export_dir: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: constants::DEFAULT_PAGE_SIZE,
            sort: SortKey::default(),
            columns: ColumnSet::default(),
            display_zone: DisplayZone::default(),
            export_dir: None,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Export directory, defaulting to the current directory.
    pub fn export_directory(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Parse config.toml text without validating values.
pub fn parse_config(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn out_of_range(field: &str, value: impl ToString, expected: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Check `[view] page_size` against the page-size bounds.
pub fn validate_page_size(size: i64) -> Result<usize, ConfigError> {
    usize::try_from(size)
        .ok()
        .filter(|s| (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(s))
        .ok_or_else(|| {
            out_of_range(
                "view.page_size",
                size,
                format!("{}-{}", constants::MIN_PAGE_SIZE, constants::MAX_PAGE_SIZE),
            )
        })
}

/// Build a column set from field keys. Every key must name a field.
pub fn validate_columns(keys: &[String]) -> Result<ColumnSet, ConfigError> {
    let mut fields = Vec::with_capacity(keys.len());
    for key in keys {
        let field = Field::parse(key).ok_or_else(|| {
            out_of_range("view.columns", key, "field keys such as timestamp, ip, path")
        })?;
        fields.push(field);
    }
    if fields.is_empty() {
        return Err(out_of_range("view.columns", "[]", "at least one column"));
    }
    Ok(ColumnSet::only(&fields))
}

/// Turn raw sections into an [`AppConfig`], collecting a warning for every
/// rejected value.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- View: page_size --
    if let Some(size) = raw.view.page_size {
        match validate_page_size(size) {
            Ok(size) => config.page_size = size,
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_PAGE_SIZE
            )),
        }
    }

    // -- View: sort_field --
    if let Some(ref key) = raw.view.sort_field {
        match Field::parse(key) {
            Some(field) => config.sort.field = field,
            None => warnings.push(format!(
                "[view] sort_field = \"{key}\" is not a known field. Using default (timestamp)."
            )),
        }
    }

    // -- View: sort_direction --
    if let Some(ref dir) = raw.view.sort_direction {
        match SortDirection::parse(dir) {
            Some(direction) => config.sort.direction = direction,
            None => warnings.push(format!(
                "[view] sort_direction = \"{dir}\" is not recognised. \
                 Expected \"asc\" or \"desc\". Using default (desc)."
            )),
        }
    }

    // -- View: columns --
    if let Some(ref keys) = raw.view.columns {
        match validate_columns(keys) {
            Ok(columns) => config.columns = columns,
            Err(e) => warnings.push(format!("{e}. Using default columns.")),
        }
    }

    // -- Time: utc_offset --
    if let Some(ref offset) = raw.time.utc_offset {
        match DisplayZone::parse(offset) {
            Some(zone) => config.display_zone = zone,
            None => warnings.push(format!(
                "[time] utc_offset = \"{offset}\" is not recognised. \
                 Expected \"local\", \"utc\" or \"+HH:MM\". Using default (local)."
            )),
        }
    }

    // -- Export: directory --
    if let Some(ref dir) = raw.export.directory {
        if !dir.trim().is_empty() {
            config.export_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    let raw = match parse_config(&content, config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, warnings) = validate(raw);
    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }
    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn validate_str(content: &str) -> (AppConfig, Vec<String>) {
        validate(parse_config(content, Path::new("config.toml")).unwrap())
    }

    #[test]
    fn test_missing_file_is_silent_default() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(config.sort, SortKey::default());
    }

    #[test]
    fn test_full_config_is_applied() {
        let (config, warnings) = validate_str(
            r#"
            [view]
            page_size = 25
            sort_field = "status"
            sort_direction = "asc"
            columns = ["timestamp", "ip", "path"]

            [time]
            utc_offset = "+05:30"

            [export]
            directory = "/tmp/exports"

            [logging]
            level = "DEBUG"
            file = "/tmp/logdeck.log"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.sort.field, Field::Status);
        assert_eq!(config.sort.direction, SortDirection::Ascending);
        assert_eq!(
            config.columns.visible(),
            vec![Field::Timestamp, Field::Ip, Field::Path]
        );
        assert_eq!(
            config.display_zone,
            DisplayZone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(config.export_directory(), PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/logdeck.log"));
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let (config, warnings) = validate_str(
            r#"
            [view]
            page_size = 0
            sort_field = "colour"
            sort_direction = "sideways"
            columns = ["ip", "nope"]

            [time]
            utc_offset = "+25:00"

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 6, "{warnings:?}");
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(config.sort, SortKey::default());
        assert_eq!(config.columns, ColumnSet::default());
        assert_eq!(config.display_zone, DisplayZone::Local);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[view\npage_size = ").unwrap();
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = validate_str("[view]\nfuture_option = true\n[other]\nx = 1\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_log_file_relative_to_data_dir() {
        let paths = PlatformPaths {
            config_dir: PathBuf::from("/cfg"),
            data_dir: PathBuf::from("/data/logdeck"),
        };
        assert_eq!(paths.log_file("logdeck.log"), PathBuf::from("/data/logdeck/logdeck.log"));
        let absolute = std::env::temp_dir().join("ld.log");
        assert_eq!(paths.log_file(&absolute.to_string_lossy()), absolute);
    }
}
