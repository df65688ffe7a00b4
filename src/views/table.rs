// ABOUTME: Generic table view model with sorting, text search and local pagination
// ABOUTME: Lists are fetched in bulk from the backend and shaped here for display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::limits::DEFAULT_PAGE_SIZE;
use xaze_core::pagination::{Page, PageRequest};

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Text columns
    Left,
    /// Money and dates
    Right,
}

/// One rendered cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Plain text
    Text {
        /// Displayed text
        text: String,
    },
    /// Number with its formatted text; `None` sorts last
    Amount {
        /// Parsed value
        value: Option<f64>,
        /// Displayed text
        text: String,
    },
    /// Status badge
    Badge {
        /// Badge label
        text: String,
        /// Highlighted variant
        active: bool,
    },
    /// Timestamp, sorted by its raw ISO form
    Date {
        /// Backend timestamp
        raw: String,
        /// Displayed text
        text: String,
    },
}

impl Cell {
    /// Plain text cell
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Text shown to the user
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::Amount { text, .. }
            | Self::Badge { text, .. }
            | Self::Date { text, .. } => text,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Amount { value: a, .. }, Self::Amount { value: b, .. }) => match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (Self::Date { raw: a, .. }, Self::Date { raw: b, .. }) => a.cmp(b),
            (Self::Badge { active: a, .. }, Self::Badge { active: b, .. }) => b.cmp(a),
            _ => self.display().to_lowercase().cmp(&other.display().to_lowercase()),
        }
    }
}

/// Column definition over rows of `T`
pub struct Column<T> {
    /// Stable key used for sorting and search
    pub key: &'static str,
    /// Header text
    pub title: &'static str,
    /// Alignment
    pub align: Align,
    /// Whether the header offers sorting
    pub sortable: bool,
    render: fn(&T) -> Cell,
}

impl<T> Column<T> {
    /// Left-aligned sortable column
    pub const fn new(key: &'static str, title: &'static str, render: fn(&T) -> Cell) -> Self {
        Self {
            key,
            title,
            align: Align::Left,
            sortable: true,
            render,
        }
    }

    /// Right-align the column
    #[must_use]
    pub const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    /// Disable sorting on the column
    #[must_use]
    pub const fn unsorted(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// Header as sent to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader {
    /// Column key
    pub key: &'static str,
    /// Header text
    pub title: &'static str,
    /// Alignment
    pub align: Align,
    /// Whether the header offers sorting
    pub sortable: bool,
}

/// Table state requested by the browser
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TableQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
    /// Rows per page
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Column key to sort by
    #[serde(default)]
    pub sort: Option<String>,
    /// Sort descending
    #[serde(default)]
    pub desc: bool,
    /// Case-insensitive search on the table's search column
    #[serde(default)]
    pub search: Option<String>,
}

/// One rendered row
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    /// Identifier used by row actions
    pub id: String,
    /// Cells in column order
    pub cells: Vec<Cell>,
}

/// Fully shaped table ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    /// Column headers
    pub columns: Vec<ColumnHeader>,
    /// Column searched by the filter box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_key: Option<&'static str>,
    /// Active sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Active sort direction
    pub desc: bool,
    /// Rows of the current page with navigation metadata
    pub page: Page<TableRow>,
}

impl TableView {
    /// Whether there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page.total == 0
    }
}

/// Column set plus row identity for one entity
pub struct Table<T> {
    columns: Vec<Column<T>>,
    row_id: fn(&T) -> String,
    search_key: Option<&'static str>,
}

impl<T> Table<T> {
    /// Table with the given columns
    #[must_use]
    pub fn new(columns: Vec<Column<T>>, row_id: fn(&T) -> String) -> Self {
        Self {
            columns,
            row_id,
            search_key: None,
        }
    }

    /// Enable the search box on one column
    #[must_use]
    pub const fn searchable(mut self, key: &'static str) -> Self {
        self.search_key = Some(key);
        self
    }

    /// Column headers
    #[must_use]
    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|c| ColumnHeader {
                key: c.key,
                title: c.title,
                align: c.align,
                sortable: c.sortable,
            })
            .collect()
    }

    /// Render every row, then search, sort and cut the requested page
    ///
    /// Unknown sort keys and search on a table without a search column are ignored.
    #[must_use]
    pub fn view(&self, rows: &[T], query: &TableQuery) -> TableView {
        let mut rendered: Vec<TableRow> = rows
            .iter()
            .map(|row| TableRow {
                id: (self.row_id)(row),
                cells: self.columns.iter().map(|c| (c.render)(row)).collect(),
            })
            .collect();

        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        if let (Some(needle), Some(index)) = (needle, self.index_of(self.search_key)) {
            rendered.retain(|row| {
                row.cells
                    .get(index)
                    .is_some_and(|cell| cell.display().to_lowercase().contains(&needle))
            });
        }

        let sort_index = self
            .index_of(query.sort.as_deref())
            .filter(|&i| self.columns.get(i).is_some_and(|c| c.sortable));
        if let Some(index) = sort_index {
            rendered.sort_by(|a, b| {
                let ordering = match (a.cells.get(index), b.cells.get(index)) {
                    (Some(x), Some(y)) => x.compare(y),
                    _ => Ordering::Equal,
                };
                if query.desc {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let request = PageRequest::new(query.page, query.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
        TableView {
            columns: self.headers(),
            search_key: self.search_key,
            sort: sort_index.map(|i| self.columns[i].key.to_owned()),
            desc: query.desc,
            page: Page::slice(rendered, request),
        }
    }

    fn index_of(&self, key: Option<&str>) -> Option<usize> {
        let key = key?;
        self.columns.iter().position(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: String,
        name: &'static str,
        amount: Option<f64>,
    }

    fn table() -> Table<Row> {
        Table::new(
            vec![
                Column::new("name", "Name", |r: &Row| Cell::text(r.name)),
                Column::new("amount", "Amount", |r: &Row| Cell::Amount {
                    value: r.amount,
                    text: r.amount.map_or_else(|| "-".to_owned(), |a| a.to_string()),
                })
                .right(),
            ],
            |r| r.id.clone(),
        )
        .searchable("name")
    }

    fn rows() -> Vec<Row> {
        (0..25)
            .map(|i| Row {
                id: format!("r{i}"),
                name: if i % 2 == 0 { "Acme" } else { "Globex" },
                amount: (i != 3).then_some(f64::from(i)),
            })
            .collect()
    }

    #[test]
    fn test_default_page_size_is_ten() {
        let view = table().view(&rows(), &TableQuery::default());
        assert_eq!(view.page.items.len(), 10);
        assert_eq!(view.page.page_count, 3);
        assert!(view.page.has_next);
    }

    #[test]
    fn test_sort_descending_puts_missing_amounts_first() {
        let query = TableQuery {
            sort: Some("amount".into()),
            desc: true,
            page_size: Some(30),
            ..TableQuery::default()
        };
        let view = table().view(&rows(), &query);
        assert_eq!(view.sort.as_deref(), Some("amount"));
        assert_eq!(view.page.items[0].id, "r3");
        assert_eq!(view.page.items[1].id, "r24");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = TableQuery {
            search: Some("  glob ".into()),
            ..TableQuery::default()
        };
        let view = table().view(&rows(), &query);
        assert_eq!(view.page.total, 12);
    }

    #[test]
    fn test_unknown_sort_key_is_ignored() {
        let query = TableQuery {
            sort: Some("nope".into()),
            ..TableQuery::default()
        };
        let view = table().view(&rows(), &query);
        assert_eq!(view.sort, None);
        assert_eq!(view.page.items[0].id, "r0");
    }

    #[test]
    fn test_empty_table() {
        let view = table().view(&[], &TableQuery::default());
        assert!(view.is_empty());
        assert_eq!(view.page.page_count, 1);
    }
}
