// LogDeck - core/query.rs
//
// Query state and pipeline orchestration:
//   records -> search -> filter -> sort -> (export | paginate -> render)
//
// `QueryState` is owned by the caller. Its setters enforce the page-reset
// contract: any change that can alter the size of the result resets the page
// to 1. The pipeline itself keeps no state between calls; identical input
// always yields identical output.

use crate::core::filter::{apply_filters, DateRange, FilterKind, FilterState};
use crate::core::model::{Field, LogRecord, StatusClass, Traffic};
use crate::core::paginate::{paginate, PageWindow};
use crate::core::sort::{sort_indices, SortDirection, SortKey};
use crate::util::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Column visibility
// =============================================================================

/// Visible table columns, one flag per [`Field`].
///
/// Affects rendering only; filtering, sorting and export ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSet {
    visible: [bool; Field::COUNT],
}

impl Default for ColumnSet {
    /// Everything except the two long free-text columns.
    fn default() -> Self {
        let mut columns = Self::all();
        columns.set(Field::UserAgent, false);
        columns.set(Field::Referer, false);
        columns
    }
}

impl ColumnSet {
    pub fn all() -> Self {
        Self {
            visible: [true; Field::COUNT],
        }
    }

    pub fn none() -> Self {
        Self {
            visible: [false; Field::COUNT],
        }
    }

    /// Exactly the given fields.
    pub fn only(fields: &[Field]) -> Self {
        let mut columns = Self::none();
        for field in fields {
            columns.set(*field, true);
        }
        columns
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.visible[field.index()]
    }

    pub fn set(&mut self, field: Field, visible: bool) {
        self.visible[field.index()] = visible;
    }

    pub fn toggle(&mut self, field: Field) {
        self.visible[field.index()] = !self.visible[field.index()];
    }

    /// Visible fields in fixed column order.
    pub fn visible(&self) -> Vec<Field> {
        Field::all()
            .iter()
            .copied()
            .filter(|f| self.is_visible(*f))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

// =============================================================================
// Query state
// =============================================================================

/// The part of a [`QueryState`] that determines the ordered result.
///
/// Two states with equal keys produce the same view of the same records, so
/// this is a safe memoisation key. Page, page size and columns are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub search: String,
    pub filters: FilterState,
    pub sort: SortKey,
}

/// Every user-controlled parameter of one derived view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryState {
    search: String,
    filters: FilterState,
    sort: SortKey,
    page: usize,
    page_size: usize,
    columns: ColumnSet,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: FilterState::default(),
            sort: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            columns: ColumnSet::default(),
        }
    }
}

impl QueryState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Current 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Column edits never change the result, so the page is kept.
    pub fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    pub fn set_columns(&mut self, columns: ColumnSet) {
        self.columns = columns;
    }

    // -- Mutations that change the result size: reset to page 1 --

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Replace the whole filter selection.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, status: Option<StatusClass>) {
        self.filters.status = status;
        self.page = 1;
    }

    pub fn set_method_filter(&mut self, method: Option<String>) {
        self.filters.method = method;
        self.page = 1;
    }

    pub fn set_content_filter(&mut self, category: Option<String>) {
        self.filters.content_category = category;
        self.page = 1;
    }

    pub fn set_traffic_filter(&mut self, traffic: Option<Traffic>) {
        self.filters.traffic = traffic;
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filters.date_range = range;
        self.page = 1;
    }

    /// Remove a single active filter (one badge).
    pub fn remove_filter(&mut self, kind: FilterKind) {
        self.filters.clear(kind);
        self.page = 1;
    }

    /// Reset every filter to "all". The search term is kept.
    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.page = 1;
    }

    /// Set rows per page, clamped to `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self.page = 1;
    }

    // -- Ordering and navigation: page is kept --

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Column-header click: the same field flips direction, a new field starts
    /// ascending.
    pub fn toggle_sort(&mut self, field: Field) {
        if self.sort.field == field {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortKey {
                field,
                direction: SortDirection::Ascending,
            };
        }
    }

    /// Jump to a page. Zero is raised to 1; pages past the end are allowed and
    /// render as empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = self.page.saturating_add(1).min(total_pages.max(1));
    }

    pub fn last_page(&mut self, total_pages: usize) {
        self.page = total_pages.max(1);
    }

    /// Memoisation key for the ordered result.
    pub fn result_key(&self) -> ResultKey {
        ResultKey {
            search: self.search.clone(),
            filters: self.filters.clone(),
            sort: self.sort,
        }
    }

    /// Stable-within-process hash of [`QueryState::result_key`], for callers
    /// that want a compact cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.result_key().hash(&mut hasher);
        hasher.finish()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Ordered indices into `records` for the search, filters and sort of `state`.
pub fn ordered_indices(records: &[LogRecord], state: &QueryState) -> Vec<usize> {
    let mut indices = apply_filters(records, &state.search, &state.filters);
    sort_indices(records, &mut indices, &state.sort);
    tracing::debug!(
        total = records.len(),
        matched = indices.len(),
        sort = state.sort.field.key(),
        "Query evaluated"
    );
    indices
}

/// Run the pipeline and return the resulting view.
pub fn execute<'a>(records: &'a [LogRecord], state: &QueryState) -> QueryView<'a> {
    QueryView::new(records, ordered_indices(records, state))
}

/// Search/filter/sort result: an ordered index list over a borrowed record set.
#[derive(Debug, Clone)]
pub struct QueryView<'a> {
    records: &'a [LogRecord],
    indices: Vec<usize>,
}

impl<'a> QueryView<'a> {
    /// Wrap precomputed indices (e.g. from a cache). Indices must be in range.
    pub fn new(records: &'a [LogRecord], indices: Vec<usize>) -> Self {
        debug_assert!(indices.iter().all(|&i| i < records.len()));
        Self { records, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Records in view order.
    pub fn records(&self) -> impl Iterator<Item = &'a LogRecord> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Pagination window for the page and page size of `state`.
    pub fn window(&self, state: &QueryState) -> PageWindow {
        paginate(self.len(), state.page, state.page_size)
    }

    /// Records on the current page of `state`.
    pub fn page_records(&self, state: &QueryState) -> Vec<&'a LogRecord> {
        let window = self.window(state);
        let records = self.records;
        self.indices[window.range]
            .iter()
            .map(|&i| &records[i])
            .collect()
    }
}
