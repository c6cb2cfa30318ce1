//! Pagination types
//!
//! Options for a paginated request and the result of fetching one page.

use crate::error::{Error, Result};
use crate::http::ResponseMeta;
use crate::request::RequestDescriptor;
use serde::{Deserialize, Serialize};

/// Options for a paginated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// First page to request (1-based)
    pub start_page: u32,
    /// Items per page; `None` leaves it to the server
    pub page_size: Option<u32>,
    /// Maximum number of pages to fetch; `None` is unbounded, `Some(0)` fetches nothing
    pub max_pages: Option<u32>,
    /// Query parameter carrying the page number
    pub page_param: String,
    /// Query parameter carrying the page size
    pub page_size_param: String,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            start_page: 1,
            page_size: None,
            max_pages: None,
            page_param: "page".to_string(),
            page_size_param: "per_page".to_string(),
        }
    }
}

impl PaginationOptions {
    /// Create default options: start at page 1, server page size, no page limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder
    pub fn builder() -> PaginationOptionsBuilder {
        PaginationOptionsBuilder::default()
    }

    /// Check the option invariants
    pub fn validate(&self) -> Result<()> {
        if self.start_page == 0 {
            return Err(Error::invalid_value("start_page", "must be at least 1"));
        }
        if self.page_size == Some(0) {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        if self.page_param.is_empty() {
            return Err(Error::invalid_value("page_param", "must not be empty"));
        }
        if self.page_size.is_some() && self.page_size_param.is_empty() {
            return Err(Error::invalid_value("page_size_param", "must not be empty"));
        }
        Ok(())
    }

    /// Build the first-page request from the caller's descriptor.
    ///
    /// The page number is only sent when it differs from the server's
    /// implicit first page.
    pub fn apply_to(&self, descriptor: &RequestDescriptor) -> RequestDescriptor {
        let mut first = descriptor.clone();
        if self.start_page != 1 {
            first = first.query(&self.page_param, self.start_page);
        }
        first.query_opt(&self.page_size_param, self.page_size)
    }

    /// The page limit has been reached after `pages_fetched` fetches
    pub fn limit_reached(&self, pages_fetched: u32) -> bool {
        self.max_pages.is_some_and(|max| pages_fetched >= max)
    }
}

/// Builder for [`PaginationOptions`]
#[derive(Debug, Default)]
pub struct PaginationOptionsBuilder {
    options: PaginationOptions,
}

impl PaginationOptionsBuilder {
    #[must_use]
    pub fn start_page(mut self, page: u32) -> Self {
        self.options.start_page = page;
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.options.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.options.max_pages = Some(pages);
        self
    }

    /// Set the query parameter names for page number and page size
    #[must_use]
    pub fn params(mut self, page_param: impl Into<String>, page_size_param: impl Into<String>) -> Self {
        self.options.page_param = page_param.into();
        self.options.page_size_param = page_size_param.into();
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<PaginationOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// One fetched page
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    /// Decoded items, in server order
    pub items: Vec<T>,
    /// Request for the next page; `None` on the last page
    pub next: Option<RequestDescriptor>,
    /// Response metadata
    pub meta: ResponseMeta,
}

impl<T> PageResult<T> {
    /// Create a page result
    pub fn new(items: Vec<T>, next: Option<RequestDescriptor>) -> Self {
        Self {
            items,
            next,
            meta: ResponseMeta::default(),
        }
    }

    /// Attach response metadata
    #[must_use]
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = meta;
        self
    }

    /// No next page
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
