use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of sales shown per ledger page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns true if `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// A request for one page of a listing. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    /// Creates a request, treating page 0 as page 1 and size 0 as the default.
    pub fn new(number: usize, size: usize) -> Self {
        Self {
            number: number.max(1),
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    /// The first page with the default size.
    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }

    /// Number of pages needed for `total_items`. An empty listing still has one page.
    pub fn page_count(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.size).max(1)
    }

    /// Pulls a page number past the end back onto the last page.
    pub fn clamp(self, total_items: usize) -> Self {
        Self {
            number: self.number.min(self.page_count(total_items)),
            size: self.size,
        }
    }

    /// Rows to skip to reach this page.
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of a listing together with its position in the whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Builds a page from already-sliced items. `request` must be clamped.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: usize) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total_items,
            total_pages: request.page_count(total_items),
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Converts the items while keeping the page position.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
