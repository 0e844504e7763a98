//! Page-number pagination primitives shared by backend endpoints.
//!
//! Inbound adapters accept loosely typed `page`/`limit` query values, clamp
//! them with [`PageParams::clamped`], and hand validated parameters to the
//! domain. Responses wrap a page of results in a [`Page`] envelope carrying
//! the total count alongside the parameters that produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 30;

/// Errors raised when constructing page parameters directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageParamsError {
    /// Page numbers start at one.
    #[error("page must be at least 1, got {0}")]
    PageOutOfRange(u32),
    /// Page sizes start at one.
    #[error("limit must be at least 1, got {0}")]
    LimitOutOfRange(u32),
}

/// Validated one-based page number and page size.
///
/// # Examples
/// ```
/// use pagination::PageParams;
///
/// let params = PageParams::clamped(Some(3), Some(100));
/// assert_eq!(params.page(), 3);
/// assert_eq!(params.limit(), 30);
/// assert_eq!(params.offset(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl PageParams {
    /// Build parameters, rejecting zero values.
    ///
    /// # Errors
    /// Returns [`PageParamsError`] when `page` or `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageParamsError> {
        if page == 0 {
            return Err(PageParamsError::PageOutOfRange(page));
        }
        if limit == 0 {
            return Err(PageParamsError::LimitOutOfRange(limit));
        }
        Ok(Self { page, limit })
    }

    /// Build parameters from optional caller input, applying defaults and
    /// clamping both values into their accepted ranges.
    #[must_use]
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .map_or(i64::from(DEFAULT_PAGE), |value| value.max(1))
            .min(i64::from(u32::MAX));
        let limit = limit
            .map_or(i64::from(DEFAULT_LIMIT), |value| value.max(1))
            .min(i64::from(MAX_LIMIT));
        Self {
            page: u32::try_from(page).unwrap_or(DEFAULT_PAGE),
            limit: u32::try_from(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of entries on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of entries preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A page of results plus the metadata needed to render navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Entries on this page, in presentation order.
    pub items: Vec<T>,
    /// Total number of matching entries across all pages.
    pub total: u64,
    /// One-based page number that produced `items`.
    pub page: u32,
    /// Page size that produced `items`.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Wrap `items` with the parameters and total that produced them.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
        }
    }

    /// Transform every entry while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}
