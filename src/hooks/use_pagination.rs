//! Page arithmetic.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;

/// One-based page number and a positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct RawPagination {
    page: usize,
    page_size: usize,
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Self::new(raw.page, raw.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Clamps `page` to at least 1 and `page_size` to at least 1.
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_page(self, page: usize) -> Self {
        Self::new(page, self.page_size)
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(self.page, page_size)
    }

    /// Inclusive row range `(from, to)` for the current page. Saturates at
    /// `usize::MAX` for pages past the addressable end.
    pub fn range(&self) -> (usize, usize) {
        let from = (self.page - 1).saturating_mul(self.page_size);
        (from, from.saturating_add(self.page_size - 1))
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    pub fn has_next(&self, count: usize) -> bool {
        self.page < self.total_pages(count)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_for_pages() {
        assert_eq!(Pagination::new(1, 10).range(), (0, 9));
        assert_eq!(Pagination::new(3, 20).range(), (40, 59));
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(Pagination::new(1, 20).total_pages(25), 2);
    }

    #[test]
    fn zero_inputs_are_clamped() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 1);
    }

    #[test]
    fn huge_pages_saturate() {
        assert_eq!(
            Pagination::new(usize::MAX, 20).range(),
            (usize::MAX, usize::MAX)
        );
        let (from, to) = Pagination::new(2, usize::MAX).range();
        assert_eq!((from, to), (usize::MAX, usize::MAX));
    }

    #[test]
    fn deserializing_clamps_like_new() {
        let p: Pagination = serde_json::from_str(r#"{"page":0,"page_size":0}"#).unwrap();
        assert_eq!(p, Pagination::new(1, 1));
        assert_eq!(p.range(), (0, 0));
    }

    #[test]
    fn navigation_flags() {
        let p = Pagination::new(2, 10);
        assert!(p.has_previous());
        assert!(p.has_next(21));
        assert!(!p.has_next(20));
    }
}
