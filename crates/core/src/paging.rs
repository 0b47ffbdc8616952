//! Page-number pagination and result envelopes.
//!
//! Listings use 1-based page numbers with a clamped page size. Offset-style
//! helpers are kept for the admin audit listing.

use serde::Serialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A resolved page request: `page >= 1`, `page_size` in `[1, MAX_PAGE_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Build from raw user input, applying defaults and clamping.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Wrap one page of items fetched with `offset()`/`page_size`.
    pub fn wrap<T>(&self, items: Vec<T>, total_count: i64) -> Page<T> {
        Page {
            items,
            total_count,
            page_count: page_count(total_count, self.page_size),
            current_page: self.page,
            page_size: self.page_size,
        }
    }

    /// Count and slice a fully materialized result set.
    pub fn slice<T>(&self, all: Vec<T>) -> Page<T> {
        let total_count = all.len() as i64;
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(take).collect();
        self.wrap(items, total_count)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A page of results plus the metadata needed to render pagination controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_count: i64,
    pub current_page: i64,
    pub page_size: i64,
}

/// `ceil(total / page_size)`; zero when there are no results.
pub fn page_count(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

/// Sort direction. Listings default to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Resolve from an optional `sort_descending` flag (default `true`).
    pub fn from_descending(descending: Option<bool>) -> Self {
        if descending.unwrap_or(true) {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// `ORDER BY` body for a whitelisted sort column with an id tie-break.
    ///
    /// Rows whose sort value is NULL (no company, no interview date) go to
    /// the end in both directions.
    pub fn order_by(self, column: &str, tie_break: &str) -> String {
        let dir = self.as_sql();
        format!("{column} {dir} NULLS LAST, {tie_break} {dir}")
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- PageRequest ---------------------------------------------------------

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = PageRequest::default();
        assert_eq!(req, PageRequest { page: 1, page_size: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PageRequest::new(None, Some(500)).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(None, Some(0)).page_size, 1);
        assert_eq!(PageRequest::new(None, Some(-3)).page_size, 1);
    }

    #[test]
    fn non_positive_pages_become_page_one() {
        assert_eq!(PageRequest::new(Some(0), None).page, 1);
        assert_eq!(PageRequest::new(Some(-7), None).page, 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    // -- page_count ----------------------------------------------------------

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 7), 4);
    }

    // -- slice ---------------------------------------------------------------

    #[test]
    fn first_page_returns_min_of_page_size_and_total() {
        let page = PageRequest::new(Some(1), Some(4)).slice((1..=3).collect::<Vec<_>>());
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page_count, 1);

        let page = PageRequest::new(Some(1), Some(2)).slice((1..=5).collect::<Vec<_>>());
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn last_partial_page() {
        let page = PageRequest::new(Some(3), Some(2)).slice((1..=5).collect::<Vec<_>>());
        assert_eq!(page.items, vec![5]);
        assert_eq!(page.current_page, 3);
    }

    #[test]
    fn page_beyond_the_end_is_empty_not_an_error() {
        let page = PageRequest::new(Some(9), Some(2)).slice((1..=5).collect::<Vec<_>>());
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
        assert_eq!(page.page_count, 3);
    }

    // -- SortDirection -------------------------------------------------------

    #[test]
    fn sort_direction_defaults_to_descending() {
        assert_eq!(SortDirection::from_descending(None), SortDirection::Desc);
        assert_eq!(SortDirection::from_descending(Some(false)), SortDirection::Asc);
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
    }

    #[test]
    fn order_by_puts_nulls_last_in_both_directions() {
        assert_eq!(
            SortDirection::Asc.order_by("c.company", "c.id"),
            "c.company ASC NULLS LAST, c.id ASC"
        );
        assert_eq!(
            SortDirection::Desc.order_by("c.interview_date", "c.id"),
            "c.interview_date DESC NULLS LAST, c.id DESC"
        );
    }

    // -- clamp helpers -------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 50, 500), 50);
        assert_eq!(clamp_limit(Some(9_000), 50, 500), 500);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
    }
}
