// LogDeck - core/paginate.rs
//
// Deterministic windowing over an ordered view. Out-of-range requests clamp
// to an empty window instead of failing.

use std::ops::Range;

/// One page of a view of `total` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Requested 1-based page number (not clamped).
    pub page: usize,
    /// Effective page size (at least 1).
    pub page_size: usize,
    /// Number of items in the whole view.
    pub total: usize,
    /// Index range of this page within the view; empty when out of range.
    pub range: Range<usize>,
}

impl PageWindow {
    /// Total page count, never less than 1.
    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages()
    }

    /// 1-based inclusive row numbers shown on this page, for the
    /// "Showing x to y of z" caption. `None` for an empty page.
    pub fn row_span(&self) -> Option<(usize, usize)> {
        if self.range.is_empty() {
            None
        } else {
            Some((self.range.start + 1, self.range.end))
        }
    }

    /// Caption text for the pager footer.
    pub fn caption(&self) -> String {
        match self.row_span() {
            Some((first, last)) => format!("Showing {first} to {last} of {} entries", self.total),
            None => format!("Showing 0 of {} entries", self.total),
        }
    }
}

/// `ceil(total / page_size)`, with a floor of 1 so an empty result still
/// reads as "Page 1 of 1".
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Compute the window for 1-based `page` of size `page_size` over `total`
/// items: `[(page-1)*page_size, min(page*page_size, total))`.
pub fn paginate(total: usize, page: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let range = if page == 0 {
        0..0
    } else {
        let start = (page - 1).saturating_mul(page_size);
        if start >= total {
            total..total
        } else {
            start..page.saturating_mul(page_size).min(total)
        }
    };
    PageWindow {
        page,
        page_size,
        total,
        range,
    }
}

/// Slice of `items` for the requested page.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let window = paginate(items.len(), page, page_size);
    &items[window.range]
}
