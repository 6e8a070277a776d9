//! Page-based pagination types shared by every list endpoint.

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Page number used when the client sends none.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the client sends none.
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size served; larger requests are clamped.
pub const MAX_LIMIT: u64 = 100;

/// A validated page request. `page` and `limit` are both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a page request from already-typed values.
    pub fn new(page: u64, limit: u64) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::InvalidArgument(
                "page must be a positive integer".to_string(),
            ));
        }
        if limit == 0 {
            return Err(AppError::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Parse raw query-string values. Absent or blank values take the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> AppResult<Self> {
        let page = parse_positive("page", page)?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive("limit", limit)?.unwrap_or(DEFAULT_LIMIT);
        Self::new(page, limit)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> AppResult<Option<u64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => Ok(Some(value as u64)),
        _ => Err(AppError::InvalidArgument(format!(
            "{name} must be a positive integer"
        ))),
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` or the numeric `1`/`-1` form.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") => Ok(Self::default()),
            Some("asc" | "1") => Ok(Self::Asc),
            Some("desc" | "-1") => Ok(Self::Desc),
            Some(other) => Err(AppError::InvalidArgument(format!(
                "Invalid sort direction: {other}"
            ))),
        }
    }
}

/// One page of results plus the metadata clients need to page further.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit());
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total_items,
            total_pages,
            has_prev_page: request.page() > 1,
            has_next_page: request.page() < total_pages,
        }
    }

    /// Convert every item, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
        }
    }

    /// Like [`Page::map`], dropping items for which `f` returns `None`.
    ///
    /// Metadata is kept as counted by the store.
    #[must_use]
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
        }
    }
}
