// LogDeck - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Record set loading (file or built-in sample)
// 4. Query evaluation, rendering, and optional export

use clap::Parser;
use logdeck::app::state::AppState;
use logdeck::core::export::{export_to_writer, suggested_filename, ExportFormat};
use logdeck::core::filter::{distinct_categories, distinct_methods, parse_date_bound, DateRange, DayEdge};
use logdeck::core::import::{load_file, ImportFormat};
use logdeck::core::model::{is_all_selection, DisplayZone, Field, LogRecord, StatusClass, Traffic};
use logdeck::core::query::ColumnSet;
use logdeck::core::sample;
use logdeck::core::sort::{SortDirection, SortKey};
use logdeck::platform::config::{load_config, AppConfig, PlatformPaths};
use logdeck::platform::fs::{resolve_export_path, write_atomic};
use logdeck::ui;
use logdeck::util::{self, constants};
use logdeck::util::error::{LogDeckError, Result};
use std::path::{Path, PathBuf};

/// LogDeck - Access-log query tool.
///
/// Search, filter, sort, paginate and export web-server access-log records.
/// Without an INPUT file the built-in sample data set is used.
#[derive(Parser, Debug)]
#[command(name = "logdeck", version, about)]
struct Cli {
    /// CSV or JSON file in the LogDeck export format.
    input: Option<PathBuf>,

    /// Input format, when the file extension does not say.
    #[arg(long = "input-format", value_parser = ["csv", "json"])]
    input_format: Option<String>,

    /// Case-insensitive search across ip, path, method, status, user agent
    /// and file type.
    #[arg(short = 's', long = "search")]
    search: Option<String>,

    /// Status bucket: 2xx, 3xx, 4xx, 5xx or all.
    #[arg(long = "status")]
    status: Option<String>,

    /// Exact HTTP method (case-sensitive), or all.
    #[arg(long = "method")]
    method: Option<String>,

    /// Exact file type (e.g. html, image, api), or all.
    #[arg(long = "type")]
    content_type: Option<String>,

    /// Traffic class: bots, humans or all.
    #[arg(long = "traffic")]
    traffic: Option<String>,

    /// Earliest timestamp to include (YYYY-MM-DD or RFC 3339).
    #[arg(long = "from")]
    from: Option<String>,

    /// Last day to include, whole day inclusive (YYYY-MM-DD or RFC 3339).
    #[arg(long = "to")]
    to: Option<String>,

    /// Sort field (timestamp, ip, method, path, status, size, user-agent,
    /// referer, file-type).
    #[arg(long = "sort")]
    sort: Option<String>,

    /// Sort ascending.
    #[arg(long = "asc", conflicts_with = "desc")]
    asc: bool,

    /// Sort descending.
    #[arg(long = "desc")]
    desc: bool,

    /// 1-based page to show.
    #[arg(long = "page", default_value_t = 1)]
    page: usize,

    /// Rows per page.
    #[arg(long = "page-size")]
    page_size: Option<usize>,

    /// Comma-separated visible columns.
    #[arg(long = "columns", value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Print statistics for the whole filtered view.
    #[arg(long = "stats")]
    stats: bool,

    /// Show details for ROW (1-based) of the current page.
    #[arg(long = "detail")]
    detail: Option<usize>,

    /// Export the whole filtered, sorted view.
    #[arg(long = "export", value_parser = ["csv", "json"])]
    export: Option<String>,

    /// Export destination (default: <export dir>/log_data_<date>.<ext>).
    #[arg(long = "out", requires = "export")]
    out: Option<PathBuf>,

    /// Path to config.toml (overrides the platform location).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let paths = PlatformPaths::resolve();
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());
    let (config, warnings) = load_config(&config_path);

    let log_file = config.log_file.as_deref().map(|file| paths.log_file(file));
    util::logging::init(cli.debug, config.log_level.as_deref(), log_file.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "LogDeck starting"
    );

    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
        eprintln!("Warning: {warning}");
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!(error = %e, "LogDeck failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let (records, source_label) = load_records(cli)?;
    let mut state = AppState::new(records, source_label, config.display_zone);

    apply_cli(cli, config, &mut state)?;

    println!(
        "{} v{} - {} ({} records)\n",
        constants::APP_NAME,
        constants::APP_VERSION,
        state.source_label,
        state.records().len()
    );

    let badges = ui::summary::render_active_filters(state.query.search(), state.query.filters());
    if !badges.is_empty() {
        println!("{badges}");
    }

    let sort = state.query.sort();
    let table = state.page_table();
    print!("{}", ui::table::render(&table, &sort));
    let window = state.window();
    println!();
    print!("{}", ui::table::render_footer(&window));

    let filters = state.query.filters();
    if window.total == 0 && (filters.method.is_some() || filters.content_category.is_some()) {
        let methods = distinct_methods(state.records());
        let categories = distinct_categories(state.records());
        println!();
        print!("{}", ui::summary::render_filter_options(&methods, &categories));
    }

    if cli.stats {
        println!();
        print!("{}", ui::summary::render_stats(&state.stats()));
    }

    if let Some(row) = cli.detail {
        let zone = state.display_zone;
        let record = state.record_on_page(row).ok_or(LogDeckError::InvalidArgument {
            name: "--detail",
            value: row.to_string(),
            expected: "a row number shown on the current page",
        })?;
        println!();
        print!("{}", ui::detail::render(record, zone));
    }

    if let Some(ref raw) = cli.export {
        let format = ExportFormat::parse(raw).ok_or_else(|| LogDeckError::InvalidArgument {
            name: "--export",
            value: raw.clone(),
            expected: "csv or json",
        })?;
        let default_name = suggested_filename(format, chrono::Local::now().date_naive());
        let path = resolve_export_path(cli.out.as_deref(), &config.export_directory(), &default_name);
        let view = state.view();
        let count = export_file(format, view.records(), &path)?;
        println!("\nExported {count} records to {}", path.display());
    }

    Ok(())
}

/// Read the input file, or fall back to the built-in sample set.
fn load_records(cli: &Cli) -> Result<(Vec<LogRecord>, String)> {
    match cli.input {
        Some(ref path) => {
            let format = cli.input_format.as_deref().and_then(ImportFormat::parse);
            let records = load_file(path, format)?;
            Ok((records, path.display().to_string()))
        }
        None => {
            let records = sample::records()?;
            tracing::info!(count = records.len(), "Using built-in sample data set");
            Ok((records, constants::SAMPLE_SOURCE_NAME.to_string()))
        }
    }
}

/// Serialise `records` in memory, then write the file atomically.
fn export_file<'a, I>(format: ExportFormat, records: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut buf = Vec::new();
    let count = export_to_writer(format, records, &mut buf, path)?;
    write_atomic(path, &buf)?;
    tracing::info!(
        count,
        format = format.extension(),
        mime = format.mime_type(),
        path = %path.display(),
        "Export complete"
    );
    Ok(count)
}

/// Translate CLI options and config defaults into query-state mutations.
fn apply_cli(cli: &Cli, config: &AppConfig, state: &mut AppState) -> Result<()> {
    let query = &mut state.query;

    query.set_columns(match cli.columns {
        Some(ref keys) => parse_columns(keys)?,
        None => config.columns,
    });

    let mut sort = config.sort;
    if let Some(ref raw) = cli.sort {
        sort = SortKey {
            field: Field::parse(raw).ok_or_else(|| LogDeckError::InvalidArgument {
                name: "--sort",
                value: raw.clone(),
                expected: "timestamp, ip, method, path, status, size, user-agent, referer or file-type",
            })?,
            direction: SortDirection::Ascending,
        };
    }
    if cli.asc {
        sort.direction = SortDirection::Ascending;
    } else if cli.desc {
        sort.direction = SortDirection::Descending;
    }
    query.set_sort(sort);

    if let Some(ref term) = cli.search {
        query.set_search(term.as_str());
    }
    if let Some(ref raw) = cli.status {
        query.set_status_filter(StatusClass::parse_selection(raw));
    }
    if let Some(ref raw) = cli.method {
        query.set_method_filter(exact_selection(raw));
    }
    if let Some(ref raw) = cli.content_type {
        query.set_content_filter(exact_selection(raw));
    }
    if let Some(ref raw) = cli.traffic {
        query.set_traffic_filter(Traffic::parse_selection(raw));
    }

    let zone = state.display_zone;
    let range = DateRange {
        from: parse_date_arg("--from", cli.from.as_deref(), zone, DayEdge::Start)?,
        to: parse_date_arg("--to", cli.to.as_deref(), zone, DayEdge::End)?,
    };
    query.set_date_range(range);

    query.set_page_size(cli.page_size.unwrap_or(config.page_size));
    query.set_page(cli.page);

    tracing::debug!(
        fingerprint = query.fingerprint(),
        page = query.page(),
        page_size = query.page_size(),
        "Query state built from CLI"
    );
    Ok(())
}

/// `all` or empty means no filter; anything else is matched exactly.
fn exact_selection(raw: &str) -> Option<String> {
    if is_all_selection(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

fn parse_date_arg(
    name: &'static str,
    raw: Option<&str>,
    zone: DisplayZone,
    edge: DayEdge,
) -> Result<Option<chrono::DateTime<chrono::FixedOffset>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    parse_date_bound(raw, zone, edge)
        .map(Some)
        .ok_or_else(|| LogDeckError::InvalidArgument {
            name,
            value: raw.to_string(),
            expected: "YYYY-MM-DD or an RFC 3339 timestamp",
        })
}

fn parse_columns(keys: &[String]) -> Result<ColumnSet> {
    let mut fields = Vec::with_capacity(keys.len());
    for key in keys.iter().filter(|k| !k.trim().is_empty()) {
        let field = Field::parse(key).ok_or_else(|| LogDeckError::InvalidArgument {
            name: "--columns",
            value: key.clone(),
            expected: "comma-separated field keys such as timestamp,ip,path",
        })?;
        fields.push(field);
    }
    if fields.is_empty() {
        return Err(LogDeckError::InvalidArgument {
            name: "--columns",
            value: keys.join(","),
            expected: "at least one field key such as timestamp,ip,path",
        });
    }
    Ok(ColumnSet::only(&fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> DisplayZone {
        DisplayZone::Fixed(chrono::FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_cli_parses_full_query() {
        let cli = Cli::try_parse_from([
            "logdeck", "--method", "POST", "--status", "2xx", "--sort", "size", "--desc",
            "--columns", "path,size", "--page-size", "5",
        ])
        .unwrap();
        let mut state = AppState::new(sample::records().unwrap(), "sample", utc());
        apply_cli(&cli, &AppConfig::default(), &mut state).unwrap();
        assert_eq!(state.query.filters().method.as_deref(), Some("POST"));
        assert_eq!(state.query.filters().status, Some(StatusClass::Success));
        assert_eq!(
            state.query.sort(),
            SortKey {
                field: Field::Size,
                direction: SortDirection::Descending
            }
        );
        assert_eq!(state.query.columns().visible(), vec![Field::Path, Field::Size]);
        assert_eq!(state.query.page_size(), 5);
    }

    #[test]
    fn test_bad_date_is_invalid_argument() {
        let cli = Cli::try_parse_from(["logdeck", "--to", "yesterday"]).unwrap();
        let mut state = AppState::new(Vec::new(), "empty", utc());
        let err = apply_cli(&cli, &AppConfig::default(), &mut state).unwrap_err();
        assert!(matches!(err, LogDeckError::InvalidArgument { name: "--to", .. }));
    }

    #[test]
    fn test_all_selections_mean_no_filter() {
        let cli = Cli::try_parse_from([
            "logdeck", "--method", "all", "--type", "All", "--traffic", "all", "--status", "all",
        ])
        .unwrap();
        let mut state = AppState::new(Vec::new(), "empty", utc());
        apply_cli(&cli, &AppConfig::default(), &mut state).unwrap();
        assert!(state.query.filters().is_empty());
    }

    #[test]
    fn test_out_requires_export() {
        assert!(Cli::try_parse_from(["logdeck", "--out", "x.csv"]).is_err());
        assert!(Cli::try_parse_from(["logdeck", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn test_empty_columns_rejected() {
        let cli = Cli::try_parse_from(["logdeck", "--columns", ""]).unwrap();
        let mut state = AppState::new(Vec::new(), "empty", utc());
        let err = apply_cli(&cli, &AppConfig::default(), &mut state).unwrap_err();
        assert!(matches!(err, LogDeckError::InvalidArgument { name: "--columns", .. }));

        let cli = Cli::try_parse_from(["logdeck", "--columns", " , "]).unwrap();
        assert!(apply_cli(&cli, &AppConfig::default(), &mut state).is_err());
    }

    #[test]
    fn test_to_date_covers_whole_day_in_display_zone() {
        let plus_two = DisplayZone::Fixed(chrono::FixedOffset::east_opt(2 * 3600).unwrap());
        let cli = Cli::try_parse_from(["logdeck", "--from", "2023-04-10", "--to", "2023-04-10"]).unwrap();
        let mut state = AppState::new(Vec::new(), "empty", plus_two);
        apply_cli(&cli, &AppConfig::default(), &mut state).unwrap();
        let (lower, upper) = state.query.filters().date_range.bounds();
        assert_eq!(lower.unwrap().to_rfc3339(), "2023-04-09T22:00:00+00:00");
        assert_eq!(
            logdeck::core::model::format_timestamp(&upper.unwrap()),
            "2023-04-10T21:59:59.999Z"
        );
    }
}
