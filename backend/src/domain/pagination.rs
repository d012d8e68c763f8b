//! Offset pagination shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Validation failures for pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// Requested window into an ordered result set.
///
/// Any positive `limit` is honoured; large windows simply return every
/// remaining row.
///
/// # Examples
/// ```
/// use roamwise::domain::PageRequest;
///
/// let page = PageRequest::new(Some(10), Some(30)).unwrap();
/// assert_eq!(page.range(), (30, 39));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Validate optional limit and offset, applying defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when the limit is zero.
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Result<Self, PageRequestError> {
        Self::with_default_limit(limit, offset, DEFAULT_PAGE_LIMIT)
    }

    /// As [`PageRequest::new`] but with an endpoint-specific default limit.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when the limit is zero.
    pub fn with_default_limit(
        limit: Option<u32>,
        offset: Option<u32>,
        default_limit: u32,
    ) -> Result<Self, PageRequestError> {
        let limit = limit.unwrap_or(default_limit);
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Inclusive row range, as used by `Range` headers.
    #[must_use]
    pub fn range(&self) -> (u64, u64) {
        let start = u64::from(self.offset);
        (start, start + u64::from(self.limit) - 1)
    }

    /// Slice an in-memory result set down to this window.
    #[must_use]
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Pagination metadata echoed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total rows matching the filters, before windowing.
    pub total: u64,
    /// Applied limit.
    pub limit: u32,
    /// Applied offset.
    pub offset: u32,
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows in this window.
    pub data: Vec<T>,
    /// Window metadata.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Assemble a page from rows and the unwindowed total.
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            pagination: Pagination {
                total,
                limit: request.limit,
                offset: request.offset,
            },
        }
    }

    /// Window an already filtered and ordered result set.
    pub fn from_all(rows: Vec<T>, request: PageRequest) -> Self {
        let total = rows.len() as u64;
        Self::new(request.slice(rows), total, request)
    }

    /// Transform every row while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Whether the window holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
