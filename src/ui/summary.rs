// LogDeck - ui/summary.rs
//
// Header lines above the table: search term, active-filter badges, and the
// optional statistics block.

use crate::core::filter::FilterState;
use crate::core::model::StatusClass;
use crate::core::stats::ViewStats;
use crate::core::table::format_bytes;
use std::fmt::Write;

/// Search term and active filters, one badge per line. Empty when neither
/// is set.
pub fn render_active_filters(search: &str, filters: &FilterState) -> String {
    let mut out = String::new();
    if !search.is_empty() {
        let _ = writeln!(out, "Search: \"{search}\"");
    }
    let active = filters.active_filters();
    if !active.is_empty() {
        out.push_str("Active filters:\n");
        for badge in &active {
            let _ = writeln!(out, "  [{}]", badge.label);
        }
    }
    out
}

/// Statistics block for `--stats`.
pub fn render_stats(stats: &ViewStats) -> String {
    let mut out = String::from("Statistics\n");
    let _ = writeln!(out, "  Requests:     {}", stats.total_records);
    let _ = writeln!(out, "  Transferred:  {}", format_bytes(stats.total_bytes));

    let status: Vec<String> = StatusClass::all()
        .iter()
        .map(|class| format!("{} {}", class.label(), stats.status_count(*class)))
        .chain((stats.other_status > 0).then(|| format!("other {}", stats.other_status)))
        .collect();
    let _ = writeln!(out, "  Status:       {}", status.join(", "));

    let _ = writeln!(out, "  Methods:      {}", join_counts(&stats.by_method));
    let _ = writeln!(out, "  File types:   {}", join_counts(&stats.by_category));
    let _ = writeln!(out, "  Traffic:      bots {}, humans {}", stats.bots, stats.humans);

    if let Some((hour, count)) = stats.peak_hour() {
        let _ = writeln!(
            out,
            "  Busiest hour: {} UTC ({count} requests)",
            hour.format("%Y-%m-%d %H:00")
        );
    }
    out
}

/// Values the exact-match filters can take, shown when a view comes up empty.
pub fn render_filter_options(methods: &[String], categories: &[String]) -> String {
    format!(
        "Available methods: {}\nAvailable file types: {}\n",
        methods.join(", "),
        categories.join(", ")
    )
}

fn join_counts(counts: &std::collections::BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "-".to_string();
    }
    counts
        .iter()
        .map(|(name, count)| format!("{name} {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
