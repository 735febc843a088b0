//! Page-based slicing of a filtered collection.

use std::ops::Range;

use serde::Serialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// 1-based page index and page size. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: usize,
    limit: usize,
}

impl Pagination {
    /// Values below 1 are raised to 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Index range of this page within a collection of `len` items.
    ///
    /// A page past the end yields an empty range.
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit).min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Clone out the items of one page.
pub fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> Vec<T> {
    items[pagination.bounds(items.len())].to_vec()
}
