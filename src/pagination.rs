//! This module defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// The pagination block reported alongside a page of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The 1-based page number that was returned.
    pub page: u64,
    /// The maximum number of transactions in the page.
    pub page_size: u64,
    /// The total number of transactions matching the query.
    pub total: u64,
    /// The total number of pages at this page size.
    pub total_pages: u64,
}

/// The number of pages needed to hold `total` items at `page_size` per page.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}
