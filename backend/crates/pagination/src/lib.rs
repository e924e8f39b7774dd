//! Page-number pagination primitives for Yatube listing views.
//!
//! Listings resolve a requested page number leniently: a missing or
//! non-numeric page yields the first page, and a page past the end yields the
//! last page. An empty result set still has one (empty) page so listing views
//! always have something to render.
//!
//! The flow is: count the matching rows, build a [`Paginator`], resolve the
//! requested [`PageNumber`], fetch the rows in the returned [`Window`], then
//! wrap them in a [`Page`].
//!
//! ```
//! use pagination::{PageNumber, PageSize, Paginator};
//!
//! let size = PageSize::new(3).expect("non-zero page size");
//! let paginator = Paginator::new(7, size);
//! let number = paginator.resolve(PageNumber::parse_lenient(Some("9")));
//! assert_eq!(number.get(), 3);
//! let window = paginator.window(number);
//! assert_eq!((window.offset(), window.limit()), (6, 3));
//! ```

use std::num::NonZeroUsize;

use serde::Serialize;

/// Errors raised when constructing pagination values from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page sizes must be at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// Page numbers are one-based.
    #[error("page number must be greater than zero")]
    ZeroPageNumber,
}

/// Number of items shown on a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Build a page size, returning `None` for zero.
    #[must_use]
    pub const fn new(size: usize) -> Option<Self> {
        match NonZeroUsize::new(size) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Build a page size, reporting zero as an error.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub const fn try_new(size: usize) -> Result<Self, PaginationError> {
        match Self::new(size) {
            Some(value) => Ok(value),
            None => Err(PaginationError::ZeroPageSize),
        }
    }

    /// Raw number of items per page.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// One-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroUsize);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Build a page number from a one-based index.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageNumber`] for zero.
    pub const fn new(number: usize) -> Result<Self, PaginationError> {
        match NonZeroUsize::new(number) {
            Some(value) => Ok(Self(value)),
            None => Err(PaginationError::ZeroPageNumber),
        }
    }

    /// Parse a `?page=` query value, falling back to the first page when the
    /// value is missing, blank, non-numeric or zero.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|value| value.parse::<usize>().ok())
            .and_then(|value| Self::new(value).ok())
            .unwrap_or(Self::FIRST)
    }

    /// Raw one-based page index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Offset/limit pair for fetching one page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    offset: usize,
    limit: usize,
}

impl Window {
    /// Build a window from explicit offset and limit values.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(self) -> usize {
        self.limit
    }
}

/// Splits a counted result set into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: usize,
    page_size: PageSize,
}

impl Paginator {
    /// Build a paginator over `total_items` rows.
    #[must_use]
    pub const fn new(total_items: usize, page_size: PageSize) -> Self {
        Self {
            total_items,
            page_size,
        }
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Number of pages; an empty result set has a single empty page.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        let pages = self.total_items.div_ceil(self.page_size.get());
        if pages == 0 { 1 } else { pages }
    }

    /// Clamp a requested page number into `1..=num_pages`.
    #[must_use]
    pub fn resolve(&self, requested: PageNumber) -> PageNumber {
        let last = PageNumber::new(self.num_pages()).unwrap_or(PageNumber::FIRST);
        requested.min(last)
    }

    /// Offset/limit for a resolved page.
    #[must_use]
    pub const fn window(&self, number: PageNumber) -> Window {
        let size = self.page_size.get();
        let offset = (number.get() - 1).saturating_mul(size);
        Window::new(offset, size)
    }
}

/// A single page of items plus the metadata listing views need to render
/// navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    number: PageNumber,
    num_pages: usize,
    total_items: usize,
}

impl<T> Page<T> {
    /// Wrap fetched rows for a resolved page.
    #[must_use]
    pub fn new(items: Vec<T>, number: PageNumber, paginator: &Paginator) -> Self {
        Self {
            items,
            number,
            num_pages: paginator.num_pages(),
            total_items: paginator.total_items(),
        }
    }

    /// An empty single-page listing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            number: PageNumber::FIRST,
            num_pages: 1,
            total_items: 0,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// This page's number.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Total number of pages in the listing.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number.get() < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number.get() > 1
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<usize> {
        if self.has_next() {
            Some(self.number.get() + 1)
        } else {
            None
        }
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<usize> {
        if self.has_previous() {
            Some(self.number.get() - 1)
        } else {
            None
        }
    }

    /// Transform every item while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total_items: self.total_items,
        }
    }
}
