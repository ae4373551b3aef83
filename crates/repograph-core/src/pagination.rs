//! Offset/limit pagination shared by the search and issues views.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Pagination state: an `offset` moved in steps of a fixed `limit`,
/// bounded by the last known `total`.
///
/// `offset` only ever changes through [`Pagination::next`],
/// [`Pagination::previous`] and [`Pagination::reset`], so it stays a
/// multiple of `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    offset: usize,
    limit: usize,
    total: usize,
}

impl Pagination {
    /// Creates a controller at offset 0. A zero `limit` is raised to 1.
    pub fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            total: 0,
        }
    }

    /// Creates a controller over a dataset of known size.
    pub fn with_total(limit: usize, total: usize) -> Self {
        let mut page = Self::new(limit);
        page.total = total;
        page
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Records the total reported by the latest response.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// `Next` is enabled iff `offset + limit <= total`.
    pub fn has_next(&self) -> bool {
        self.offset + self.limit <= self.total
    }

    /// `Previous` is enabled iff `offset != 0`.
    pub fn has_previous(&self) -> bool {
        self.offset != 0
    }

    /// Advances one page. Returns `true` if the offset changed, in which
    /// case the caller re-runs its query.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.offset += self.limit;
        true
    }

    /// Goes back one page. Returns `true` if the offset changed.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.limit);
        true
    }

    /// Back to the first page.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Restores an offset previously reached through paging, aligned down
    /// to a multiple of `limit`.
    pub(crate) fn rewind_to(&mut self, offset: usize) {
        self.offset = offset - offset % self.limit;
    }

    /// Index window of the current page within a client-side dataset.
    pub fn window(&self) -> Range<usize> {
        let start = self.offset.min(self.total);
        let end = (self.offset + self.limit).min(self.total);
        start..end
    }

    /// Slices the current page out of a fully loaded dataset.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = (self.offset + self.limit).min(items.len());
        &items[start..end]
    }

    /// "Showing 11 to 20 of 25 results".
    pub fn summary(&self) -> String {
        let range = self.window();
        if range.is_empty() {
            return format!("Showing 0 of {} results", self.total);
        }
        format!(
            "Showing {} to {} of {} results",
            range.start + 1,
            range.end,
            self.total
        )
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_QUERY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enablement_rules() {
        for total in 1..=40 {
            for step in 0..5 {
                let limit = 10;
                let mut page = Pagination::with_total(limit, total);
                for _ in 0..step {
                    page.next();
                }
                let offset = page.offset();
                assert_eq!(page.has_next(), offset + limit <= total, "total={total} offset={offset}");
                assert_eq!(page.has_previous(), offset != 0);
            }
        }
    }

    #[test]
    fn test_walkthrough_limit_10_total_25() {
        let mut page = Pagination::with_total(10, 25);
        assert!(!page.has_previous());

        assert!(page.next());
        assert_eq!(page.offset(), 10);
        assert!(page.next());
        assert_eq!(page.offset(), 20);

        // 20 + 10 > 25
        assert!(!page.has_next());
        assert!(!page.next());
        assert_eq!(page.offset(), 20);

        assert!(page.previous());
        assert_eq!(page.offset(), 10);
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut page = Pagination::with_total(5, 12);
        assert!(!page.previous());
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset_stays_multiple_of_limit() {
        let mut page = Pagination::with_total(7, 100);
        for _ in 0..20 {
            page.next();
            assert_eq!(page.offset() % 7, 0);
        }
        for _ in 0..20 {
            page.previous();
            assert_eq!(page.offset() % 7, 0);
        }
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let page = Pagination::new(0);
        assert_eq!(page.limit(), 1);
    }

    #[test]
    fn test_slice_and_summary() {
        let rows: Vec<u32> = (0..25).collect();
        let mut page = Pagination::with_total(10, rows.len());
        page.next();
        page.next();
        assert_eq!(page.slice(&rows), &[20, 21, 22, 23, 24]);
        assert_eq!(page.window(), 20..25);
        assert_eq!(page.summary(), "Showing 21 to 25 of 25 results");
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Pagination::new(10).summary(), "Showing 0 of 0 results");
    }
}
