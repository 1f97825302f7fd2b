// LogDeck - core/filter.rs
//
// Composable filter engine for access-log records.
// All active filters are AND-combined; a `None` selection passes everything.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{DisplayZone, LogRecord, StatusClass, Traffic};
use crate::core::search::matches_search_lower;
use crate::util::constants::DISPLAY_DATE_FORMAT;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::HashSet;

pub use crate::core::model::is_bot;

/// Optional inclusive date range.
///
/// Offsets are kept so that "end of day" for `to` is computed in the
/// caller's own calendar rather than UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Inclusive lower bound, compared directly against the record instant.
    pub from: Option<DateTime<FixedOffset>>,

    /// Inclusive upper bound. Only its calendar day matters: it is widened to
    /// 23:59:59.999 of that day in its own offset.
    pub to: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Resolved `(lower, upper)` instants, with `to` normalised to end of day.
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let lower = self.from.map(|from| from.with_timezone(&Utc));
        let upper = self.to.map(|to| end_of_day(to).with_timezone(&Utc));
        (lower, upper)
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        let (lower, upper) = self.bounds();
        within(ts, lower.as_ref(), upper.as_ref())
    }
}

/// 23:59:59.999 on the calendar day of `ts`, in the offset of `ts`.
pub fn end_of_day(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|naive| naive.and_local_timezone(*ts.offset()).single())
        .unwrap_or(ts)
}

/// Which end of a calendar day a bare `YYYY-MM-DD` bound names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEdge {
    /// 00:00:00.000, for `from`.
    Start,
    /// 23:59:59.999, for `to`.
    End,
}

/// Parse a date-range bound: a calendar date `YYYY-MM-DD`, read as wall-clock
/// time in `zone` on that date, or a full RFC 3339 timestamp, which keeps its
/// own offset.
pub fn parse_date_bound(raw: &str, zone: DisplayZone, edge: DayEdge) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT).ok()?;
    let naive = match edge {
        DayEdge::Start => date.and_hms_milli_opt(0, 0, 0, 0)?,
        DayEdge::End => date.and_hms_milli_opt(23, 59, 59, 999)?,
    };
    zone.resolve_local(naive)
}

fn within(ts: &DateTime<Utc>, lower: Option<&DateTime<Utc>>, upper: Option<&DateTime<Utc>>) -> bool {
    if let Some(lower) = lower {
        if ts < lower {
            return false;
        }
    }
    if let Some(upper) = upper {
        if ts > upper {
            return false;
        }
    }
    true
}

/// Complete structured filter selection. All fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Status bucket to include (`None` = all).
    pub status: Option<StatusClass>,

    /// Exact, case-sensitive HTTP method (`None` = all).
    pub method: Option<String>,

    /// Exact content category (`None` = all).
    pub content_category: Option<String>,

    /// Bot or human traffic only (`None` = all).
    pub traffic: Option<Traffic>,

    /// Inclusive date range; either side may be open.
    pub date_range: DateRange,
}

/// Filter categories, used to remove one active filter at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Status,
    Method,
    ContentType,
    Traffic,
    DateRange,
}

/// One entry of the active-filters summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    /// Category this entry describes; pass to [`FilterState::clear`] to remove it.
    pub kind: FilterKind,
    /// Display text, e.g. `Method: POST`.
    pub label: String,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.method.is_none()
            && self.content_category.is_none()
            && self.traffic.is_none()
            && self.date_range.is_empty()
    }

    /// Reset one filter category to "all".
    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Status => self.status = None,
            FilterKind::Method => self.method = None,
            FilterKind::ContentType => self.content_category = None,
            FilterKind::Traffic => self.traffic = None,
            FilterKind::DateRange => self.date_range = DateRange::default(),
        }
    }

    /// Human-readable summary of every non-default filter, in display order.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active = Vec::new();

        if let Some(status) = self.status {
            active.push(ActiveFilter {
                kind: FilterKind::Status,
                label: format!("Status: {status}"),
            });
        }
        if let Some(ref method) = self.method {
            active.push(ActiveFilter {
                kind: FilterKind::Method,
                label: format!("Method: {method}"),
            });
        }
        if let Some(ref category) = self.content_category {
            active.push(ActiveFilter {
                kind: FilterKind::ContentType,
                label: format!("Type: {category}"),
            });
        }
        if let Some(traffic) = self.traffic {
            active.push(ActiveFilter {
                kind: FilterKind::Traffic,
                label: format!("Traffic: {traffic}"),
            });
        }

        let day = |ts: &DateTime<FixedOffset>| ts.format(DISPLAY_DATE_FORMAT).to_string();
        let date_text = match (&self.date_range.from, &self.date_range.to) {
            (Some(from), Some(to)) => Some(format!("{} - {}", day(from), day(to))),
            (Some(from), None) => Some(format!("From {}", day(from))),
            (None, Some(to)) => Some(format!("Until {}", day(to))),
            (None, None) => None,
        };
        if let Some(text) = date_text {
            active.push(ActiveFilter {
                kind: FilterKind::DateRange,
                label: format!("Date: {text}"),
            });
        }

        active
    }
}

/// Check a single record against every active structured filter.
pub fn passes_filters(filter: &FilterState, record: &LogRecord) -> bool {
    let (lower, upper) = filter.date_range.bounds();
    matches_all(record, filter, lower.as_ref(), upper.as_ref())
}

/// Apply search and filters to a slice of records, returning indices of
/// matching records in their original order.
///
/// Returns indices into the original slice. This avoids copying records and
/// leaves ordering to the sort stage.
pub fn apply_filters(records: &[LogRecord], search: &str, filter: &FilterState) -> Vec<usize> {
    if search.is_empty() && filter.is_empty() {
        return (0..records.len()).collect();
    }

    let search_lower = search.to_lowercase();
    let (lower, upper) = filter.date_range.bounds();

    let matched: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            matches_search_lower(&search_lower, record)
                && matches_all(record, filter, lower.as_ref(), upper.as_ref())
        })
        .map(|(idx, _)| idx)
        .collect();

    tracing::trace!(
        total = records.len(),
        matched = matched.len(),
        "Filters applied"
    );
    matched
}

fn matches_all(
    record: &LogRecord,
    filter: &FilterState,
    lower: Option<&DateTime<Utc>>,
    upper: Option<&DateTime<Utc>>,
) -> bool {
    // Exact-match filters first; they are the cheapest.
    if let Some(ref method) = filter.method {
        if record.method != *method {
            return false;
        }
    }
    if let Some(ref category) = filter.content_category {
        if record.content_category != *category {
            return false;
        }
    }

    if let Some(status) = filter.status {
        if !status.contains(record.status_code) {
            return false;
        }
    }

    if let Some(traffic) = filter.traffic {
        if Traffic::of(&record.agent_string) != traffic {
            return false;
        }
    }

    within(&record.occurred_at, lower, upper)
}

/// Distinct HTTP methods in first-seen order, for filter dropdowns.
pub fn distinct_methods(records: &[LogRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.method.as_str()))
}

/// Distinct content categories in first-seen order, for filter dropdowns.
pub fn distinct_categories(records: &[LogRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.content_category.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
