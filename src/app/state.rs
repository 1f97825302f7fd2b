// LogDeck - app/state.rs
//
// Application state management. Holds the loaded record set, the query
// state, and a memoised ordered view keyed by the result-affecting part of
// the query.

use crate::core::model::{DisplayZone, LogRecord};
use crate::core::paginate::{paginate, PageWindow};
use crate::core::query::{ordered_indices, QueryState, QueryView, ResultKey};
use crate::core::stats::ViewStats;
use crate::core::table::TableView;
use std::sync::Arc;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Immutable record set, shared with anything that needs to read it.
    records: Arc<[LogRecord]>,

    /// Label of where the records came from (file path or sample name).
    pub source_label: String,

    /// Search, filters, sort, pagination and columns.
    pub query: QueryState,

    /// Zone used to render timestamps and read calendar dates.
    pub display_zone: DisplayZone,

    /// Last computed ordered view and the key it was computed for.
    cache: Option<(ResultKey, Vec<usize>)>,
}

impl AppState {
    pub fn new(records: Vec<LogRecord>, source_label: impl Into<String>, display_zone: DisplayZone) -> Self {
        Self {
            records: records.into(),
            source_label: source_label.into(),
            query: QueryState::default(),
            display_zone,
            cache: None,
        }
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Swap in a new record set. The query is kept; the page resets.
    pub fn replace_records(&mut self, records: Vec<LogRecord>, source_label: impl Into<String>) {
        self.records = records.into();
        self.source_label = source_label.into();
        self.cache = None;
        self.query.first_page();
    }

    /// Ordered indices for the current query, recomputed only when search,
    /// filters or sort changed since the last call.
    pub fn refresh(&mut self) -> &[usize] {
        let key = self.query.result_key();
        let stale = !matches!(&self.cache, Some((cached, _)) if *cached == key);
        if stale {
            let indices = ordered_indices(&self.records, &self.query);
            self.cache = Some((key, indices));
        } else {
            tracing::trace!("View served from cache");
        }
        match &self.cache {
            Some((_, indices)) => indices.as_slice(),
            None => &[],
        }
    }

    /// The current ordered view.
    pub fn view(&mut self) -> QueryView<'_> {
        let indices = self.refresh().to_vec();
        QueryView::new(&self.records, indices)
    }

    /// Number of records in the current view.
    pub fn result_count(&mut self) -> usize {
        self.refresh().len()
    }

    /// Pagination window for the current page.
    pub fn window(&mut self) -> PageWindow {
        let total = self.result_count();
        paginate(total, self.query.page(), self.query.page_size())
    }

    /// Records on the current page, in view order.
    pub fn page_records(&mut self) -> Vec<&LogRecord> {
        let window = self.window();
        self.refresh();
        let records: &[LogRecord] = &self.records;
        match &self.cache {
            Some((_, indices)) => indices[window.range].iter().map(|&i| &records[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Table projection of the current page.
    pub fn page_table(&mut self) -> TableView {
        let columns = *self.query.columns();
        let zone = self.display_zone;
        TableView::build(self.page_records(), &columns, zone)
    }

    /// The record shown at 1-based `row` of the current page.
    pub fn record_on_page(&mut self, row: usize) -> Option<&LogRecord> {
        let window = self.window();
        let position = window.range.start.checked_add(row.checked_sub(1)?)?;
        if position >= window.range.end {
            return None;
        }
        self.refresh();
        let records: &[LogRecord] = &self.records;
        match &self.cache {
            Some((_, indices)) => indices.get(position).map(|&i| &records[i]),
            None => None,
        }
    }

    /// Statistics over the whole current view.
    pub fn stats(&mut self) -> ViewStats {
        self.refresh();
        let records: &[LogRecord] = &self.records;
        match &self.cache {
            Some((_, indices)) => ViewStats::compute(indices.iter().map(|&i| &records[i])),
            None => ViewStats::default(),
        }
    }
}
