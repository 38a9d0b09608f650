//! Pagination contract: page requests and the paginated envelope.
//!
//! # Invariants
//! - `take` used for arithmetic is always >= 1.
//! - `total_pages = ceil(total / take)`.
//! - `current_page = floor(skip / take) + 1` unless explicitly overridden.

use serde::Serialize;

/// Page size applied when the caller omits `take` (or passes 0).
pub const DEFAULT_PAGE_SIZE: u32 = 9;
/// Upper bound for `take` on any public surface.
pub const MAX_TAKE: u32 = 500;

/// Normalized take/skip pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    take: u32,
    skip: u32,
}

impl PageRequest {
    /// Builds a request with [`DEFAULT_PAGE_SIZE`] as fallback.
    pub fn new(take: Option<u32>, skip: Option<u32>) -> Self {
        Self::with_default_size(take, skip, DEFAULT_PAGE_SIZE)
    }

    /// Builds a request; `None`/`0` take becomes `default_size`, and take is
    /// clamped into `1..=MAX_TAKE`.
    pub fn with_default_size(take: Option<u32>, skip: Option<u32>, default_size: u32) -> Self {
        let take = match take {
            Some(value) if value > 0 => value,
            _ => default_size,
        };
        Self {
            take: take.clamp(1, MAX_TAKE),
            skip: skip.unwrap_or(0),
        }
    }

    pub fn take(&self) -> u32 {
        self.take
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results with navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub take: u32,
    pub skip: u32,
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T> Paginated<T> {
    /// Maps every result while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            results: self.results.into_iter().map(f).collect(),
            total: self.total,
            take: self.take,
            skip: self.skip,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

/// Input of [`paginate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageInput<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub take: u32,
    pub skip: u32,
    pub current_page: Option<u64>,
}

/// Wraps `input.results` with page metadata.
///
/// A zero `take` is clamped to 1 rather than dividing by zero.
pub fn paginate<T>(input: PageInput<T>) -> Paginated<T> {
    let take = input.take.max(1);
    let total_pages = input.total.div_ceil(u64::from(take));
    let current_page = input
        .current_page
        .unwrap_or_else(|| u64::from(input.skip / take) + 1);

    Paginated {
        results: input.results,
        total: input.total,
        take,
        skip: input.skip,
        total_pages,
        current_page,
    }
}

#[cfg(test)]
mod tests {
    use super::{paginate, PageInput, PageRequest, DEFAULT_PAGE_SIZE, MAX_TAKE};

    fn page(total: u64, take: u32, skip: u32, current_page: Option<u64>) -> PageInput<u8> {
        PageInput {
            results: Vec::new(),
            total,
            take,
            skip,
            current_page,
        }
    }

    #[test]
    fn computes_total_pages_and_current_page() {
        let paginated = paginate(page(95, 10, 20, None));
        assert_eq!(paginated.total_pages, 10);
        assert_eq!(paginated.current_page, 3);
    }

    #[test]
    fn explicit_current_page_is_kept() {
        assert_eq!(paginate(page(95, 10, 20, Some(7))).current_page, 7);
    }

    #[test]
    fn zero_take_is_clamped_instead_of_dividing_by_zero() {
        let paginated = paginate(page(3, 0, 2, None));
        assert_eq!(paginated.take, 1);
        assert_eq!(paginated.total_pages, 3);
        assert_eq!(paginated.current_page, 3);
    }

    #[test]
    fn empty_total_has_zero_pages() {
        let paginated = paginate(page(0, 9, 0, None));
        assert_eq!(paginated.total_pages, 0);
        assert_eq!(paginated.current_page, 1);
    }

    #[test]
    fn page_request_defaults_and_clamps_take() {
        assert_eq!(PageRequest::new(None, None).take(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(0), Some(4)).take(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(0), Some(4)).skip(), 4);
        assert_eq!(PageRequest::new(Some(10_000), None).take(), MAX_TAKE);
        assert_eq!(PageRequest::with_default_size(None, None, 0).take(), 1);
    }

    #[test]
    fn map_preserves_metadata() {
        let paginated = paginate(PageInput {
            results: vec![1_u8, 2],
            total: 2,
            take: 9,
            skip: 0,
            current_page: None,
        })
        .map(|value| value.to_string());
        assert_eq!(paginated.results, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(paginated.total_pages, 1);
    }
}
