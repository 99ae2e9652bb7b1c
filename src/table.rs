//! In-memory table representation shared by the loader and the reconcilers.
//!
//! A [`Table`] is a rectangular grid of trimmed string cells with a designated
//! header row, key column and body boundary. Rows and columns are identified by
//! key and header name rather than by position; [`HeaderIndex`] and [`Row`]
//! provide the name-based lookups.

use crate::error::{DiffError, HeaderProblem};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which input a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// A loaded table, as handed over by the table-loading collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// All rows of the sheet, rectangular, including preamble and postamble.
    pub rows: Vec<Vec<String>>,
    /// 0-based index of the header row in `rows`.
    pub header_row: usize,
    /// 0-based index of the first row past the table body.
    pub body_end: usize,
    /// Name of the key column.
    pub key: String,
}

impl Table {
    /// Creates a table, computing the body boundary as the first row after the
    /// header whose key cell is empty.
    ///
    /// If the key column is absent from the header row the body is taken to
    /// extend to the end of `rows`; the orchestrator reports the missing key.
    pub fn new(rows: Vec<Vec<String>>, header_row: usize, key: impl Into<String>) -> Self {
        let key = key.into();
        let body_end = find_body_end(&rows, header_row, &key);
        Self {
            rows,
            header_row,
            body_end,
            key,
        }
    }

    /// Creates a table from explicit bounds.
    pub fn with_bounds(
        rows: Vec<Vec<String>>,
        header_row: usize,
        body_end: usize,
        key: impl Into<String>,
    ) -> Self {
        Self {
            rows,
            header_row,
            body_end,
            key: key.into(),
        }
    }

    pub fn headers(&self) -> &[String] {
        self.rows
            .get(self.header_row)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rows above the header row.
    pub fn preamble(&self) -> &[Vec<String>] {
        &self.rows[..self.header_row.min(self.rows.len())]
    }

    /// Rows between the header row and the body boundary.
    pub fn body(&self) -> &[Vec<String>] {
        let start = (self.header_row + 1).min(self.rows.len());
        let end = self.body_end.clamp(start, self.rows.len());
        &self.rows[start..end]
    }

    /// Rows from the body boundary to the end.
    pub fn postamble(&self) -> &[Vec<String>] {
        let start = self.body_end.max(self.header_row + 1).min(self.rows.len());
        &self.rows[start..]
    }

    /// 0-based index in `rows` of the first body row.
    pub fn body_start(&self) -> usize {
        self.header_row + 1
    }
}

fn find_body_end(rows: &[Vec<String>], header_row: usize, key: &str) -> usize {
    let Some(j_key) = rows
        .get(header_row)
        .and_then(|headers| headers.iter().position(|h| h == key))
    else {
        return rows.len();
    };

    (header_row + 1..rows.len())
        .find(|&i| rows[i].get(j_key).map_or(true, |v| v.is_empty()))
        .unwrap_or(rows.len())
}

/// Header name to column position lookup, validated for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index, rejecting empty or duplicate header names.
    pub fn build(side: Side, headers: &[String]) -> Result<Self, DiffError> {
        let mut positions = HashMap::with_capacity(headers.len());
        for (j, name) in headers.iter().enumerate() {
            if name.is_empty() {
                return Err(DiffError::MalformedHeaders {
                    side,
                    column: j + 1,
                    reason: HeaderProblem::Empty,
                });
            }
            if positions.insert(name.clone(), j).is_some() {
                return Err(DiffError::MalformedHeaders {
                    side,
                    column: j + 1,
                    reason: HeaderProblem::Duplicate(name.clone()),
                });
            }
        }
        Ok(Self { positions })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    /// Wraps a row of cells from the same table for lookup by header name.
    pub fn row<'a>(&'a self, cells: &'a [String]) -> Row<'a> {
        Row {
            index: self,
            cells,
        }
    }
}

/// A table row addressable both by header name and by position.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: &'a HeaderIndex,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Value of the named column, or `None` if the column is not in this table.
    pub fn get(&self, header: &str) -> Option<&'a str> {
        self.index
            .position(header)
            .and_then(|j| self.cells.get(j))
            .map(String::as_str)
    }

    /// Values aligned to `headers`, with `""` where a header is not in this table.
    pub fn aligned(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|h| self.get(h).unwrap_or_default().to_string())
            .collect()
    }
}
