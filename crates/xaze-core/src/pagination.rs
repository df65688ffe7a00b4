// ABOUTME: Offset pagination for lists fetched in bulk and paged locally
// ABOUTME: Page requests are clamped so an out-of-range page yields the last page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use crate::constants::limits::DEFAULT_PAGE_SIZE;

/// Which page of a list to show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Request a specific page
    #[must_use]
    pub const fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Page size with zero treated as the default
    #[must_use]
    pub const fn effective_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// One page of rows plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Zero-based index of this page
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Rows across all pages
    pub total: usize,
    /// Number of pages, at least one
    pub page_count: usize,
    /// Whether a previous page exists
    pub has_prev: bool,
    /// Whether a next page exists
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Cut one page out of a fully materialized list
    #[must_use]
    pub fn slice(rows: Vec<T>, request: PageRequest) -> Self {
        let page_size = request.effective_size();
        let total = rows.len();
        let page_count = total.div_ceil(page_size).max(1);
        let page = request.page.min(page_count - 1);
        let start = page * page_size;

        let items: Vec<T> = rows.into_iter().skip(start).take(page_size).collect();

        Self {
            items,
            page,
            page_size,
            total,
            page_count,
            has_prev: page > 0,
            has_next: page + 1 < page_count,
        }
    }

    /// Empty first page
    #[must_use]
    pub fn empty(page_size: usize) -> Self {
        Self::slice(Vec::new(), PageRequest::new(0, page_size))
    }

    /// Transform the rows, keeping the metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            page_count: self.page_count,
            has_prev: self.has_prev,
            has_next: self.has_next,
        }
    }
}
