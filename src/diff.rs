//! Table diff orchestration.
//!
//! This module composes the sequence differ, the header reconciler and the
//! row reconciler into one annotated [`DiffResult`]. The result is a single
//! grid of [`DiffRow`]s laid out in contiguous zones:
//!
//! 1. an optional comment row (e.g. the command line that produced the diff)
//! 2. the preamble: lines above the table, diffed as opaque text
//! 3. the header zone: one header row, or an old/new pair if columns changed
//! 4. the body: reconciled table rows
//! 5. the postamble: lines below the table, diffed as opaque text
//!
//! # Examples
//!
//! ```
//! use tablediff_rs::{compute_diff, DiffConfig, RowTag, Table};
//!
//! let grid = |rows: &[&[&str]]| -> Vec<Vec<String>> {
//!     rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
//! };
//!
//! let old = Table::new(grid(&[&["ID", "Color"], &["1", "Red"]]), 0, "ID");
//! let new = Table::new(grid(&[&["ID", "Color"], &["1", "Blue"]]), 0, "ID");
//!
//! let diff = compute_diff(&old, &new, &DiffConfig::default()).unwrap();
//!
//! assert_eq!(diff.changes, 1);
//! assert_eq!(diff.rows[diff.body_start].tag, RowTag::ChangedOld);
//! assert_eq!(diff.rows[diff.body_start + 1].tag, RowTag::ChangedNew);
//! ```

use crate::error::DiffError;
use crate::headers::{reconcile_headers, HeaderDiff};
use crate::lcs::{diff_sequences, Tag};
use crate::rows::{reconcile_rows, BodyView};
use crate::table::{HeaderIndex, Side, Table};
use serde::Serialize;

/// The status of one row of the diff grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowTag {
    /// Present in both with no compared value changed
    #[serde(rename = "=")]
    Same,
    /// Present only in old
    #[serde(rename = "-")]
    Deleted,
    /// Present only in new
    #[serde(rename = "+")]
    Added,
    /// Old content of a changed row; always followed by `ChangedNew`
    #[serde(rename = "c-")]
    ChangedOld,
    /// New content of a changed row
    #[serde(rename = "c+")]
    ChangedNew,
    /// Echo or comment line, not part of either input
    #[serde(rename = "#")]
    Comment,
}

impl RowTag {
    /// The marker written in the first column of rendered output.
    pub fn marker(&self) -> &'static str {
        match self {
            RowTag::Same => "=",
            RowTag::Deleted => "-",
            RowTag::Added => "+",
            RowTag::ChangedOld => "c-",
            RowTag::ChangedNew => "c+",
            RowTag::Comment => "#",
        }
    }
}

impl From<Tag> for RowTag {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Same => RowTag::Same,
            Tag::Deleted => RowTag::Deleted,
            Tag::Added => RowTag::Added,
        }
    }
}

/// One row of the diff grid, with cells aligned to [`DiffResult::headers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    pub tag: RowTag,
    pub cells: Vec<String>,
}

impl DiffRow {
    pub fn new(tag: RowTag, cells: Vec<String>) -> Self {
        Self { tag, cells }
    }

    /// Number of positions at which this row and `other` hold different values.
    pub fn differing_cells(&self, other: &DiffRow) -> usize {
        let common = self
            .cells
            .iter()
            .zip(&other.cells)
            .filter(|(a, b)| a != b)
            .count();
        common + self.cells.len().abs_diff(other.cells.len())
    }
}

/// Which region of the diff grid a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Comment,
    Preamble,
    Header,
    Body,
    Postamble,
}

/// Configuration for the diff.
#[derive(Debug, Clone, Default)]
pub struct DiffConfig {
    /// Columns shown in the output but excluded from row equality.
    /// Each must exist in both tables.
    pub ignore_headers: Vec<String>,
    /// Text for a leading comment row, if any
    pub comment: Option<String>,
}

/// The complete diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Reconciled header names; every row's cells align with these
    pub headers: Vec<String>,
    /// One tag per header
    pub header_tags: Vec<Tag>,
    /// The diff grid, zone by zone
    pub rows: Vec<DiffRow>,
    /// Index of the first header row
    pub header_start: usize,
    /// Index of the first body row
    pub body_start: usize,
    /// Index of the first postamble row
    pub postamble_start: usize,
    /// Number of differing units: preamble and postamble lines, columns,
    /// added and deleted rows, and changed cells
    pub changes: usize,
}

impl DiffResult {
    /// Returns true if the two inputs did not differ.
    pub fn is_empty(&self) -> bool {
        self.changes == 0
    }

    /// Returns the zone of row `i`.
    pub fn zone(&self, i: usize) -> Zone {
        if i >= self.postamble_start {
            Zone::Postamble
        } else if i >= self.body_start {
            Zone::Body
        } else if i >= self.header_start {
            Zone::Header
        } else if self.rows[i].tag == RowTag::Comment {
            Zone::Comment
        } else {
            Zone::Preamble
        }
    }

    /// Returns the old and new header rows. They are the same row when no
    /// column was added or deleted.
    pub fn header_rows(&self) -> (&DiffRow, &DiffRow) {
        let old = &self.rows[self.header_start];
        let new = &self.rows[self.body_start - 1];
        (old, new)
    }

    pub fn body(&self) -> &[DiffRow] {
        &self.rows[self.body_start..self.postamble_start]
    }

    /// Keys of body rows that were deleted, added or changed, in grid order.
    /// With `include_unchanged`, keys of unchanged rows are listed too.
    ///
    /// `key` names the key column of the new table. A changed row contributes
    /// its key once. Returns an empty list if `key` is not a header.
    pub fn changed_keys(&self, key: &str, include_unchanged: bool) -> Vec<&str> {
        let (_, new_headers) = self.header_rows();
        let Some(j_key) = new_headers.cells.iter().position(|h| h == key) else {
            return Vec::new();
        };

        self.body()
            .iter()
            .filter(|row| match row.tag {
                RowTag::Deleted | RowTag::Added | RowTag::ChangedOld => true,
                RowTag::Same => include_unchanged,
                _ => false,
            })
            .map(|row| row.cells[j_key].as_str())
            .collect()
    }
}

/// Computes the diff between two tables.
///
/// # Errors
///
/// Fails with a [`DiffError`] if either table violates the header or key
/// invariants, or if an ignored column is not common to both tables. No
/// partial result is produced.
pub fn compute_diff(old: &Table, new: &Table, config: &DiffConfig) -> Result<DiffResult, DiffError> {
    let header_diff = reconcile_headers(old.headers(), new.headers())?;
    for (table, side) in [(old, Side::Old), (new, Side::New)] {
        if !table.headers().contains(&table.key) {
            return Err(DiffError::KeyColumnNotFound {
                side,
                key: table.key.clone(),
            });
        }
    }

    let width = header_diff.headers.len();
    let mut rows = Vec::new();

    if let Some(comment) = &config.comment {
        let mut cells = vec![String::new(); width.max(1)];
        cells[0] = comment.clone();
        rows.push(DiffRow::new(RowTag::Comment, cells));
    }

    let mut changes = diff_lines(&mut rows, old.preamble(), new.preamble(), width);
    let header_start = rows.len();
    changes += push_header_rows(&mut rows, &header_diff);
    let body_start = rows.len();
    log::debug!(
        "header zone at row {}, body at row {}",
        header_start,
        body_start
    );

    let body = reconcile_rows(
        BodyView {
            side: Side::Old,
            rows: old.body(),
            first_row: old.body_start(),
            key: &old.key,
        },
        BodyView {
            side: Side::New,
            rows: new.body(),
            first_row: new.body_start(),
            key: &new.key,
        },
        &header_diff,
        &config.ignore_headers,
    )?;
    changes += body.changes;
    rows.extend(body.rows);

    let postamble_start = rows.len();
    changes += diff_lines(&mut rows, old.postamble(), new.postamble(), width);

    log::info!("{} total differences found", changes);

    Ok(DiffResult {
        headers: header_diff.headers,
        header_tags: header_diff.tags,
        rows,
        header_start,
        body_start,
        postamble_start,
        changes,
    })
}

/// Appends the header zone and returns the number of column changes.
fn push_header_rows(rows: &mut Vec<DiffRow>, header_diff: &HeaderDiff) -> usize {
    if header_diff.is_unchanged() {
        rows.push(DiffRow::new(RowTag::Same, header_diff.headers.clone()));
        return 0;
    }

    let old_row = DiffRow::new(
        RowTag::ChangedOld,
        side_header_row(&header_diff.headers, &header_diff.old),
    );
    let new_row = DiffRow::new(
        RowTag::ChangedNew,
        side_header_row(&header_diff.headers, &header_diff.new),
    );
    let changes = old_row.differing_cells(&new_row);

    rows.push(old_row);
    rows.push(new_row);
    changes
}

/// The reconciled headers as one side sees them: blank where the side lacks
/// the column.
fn side_header_row(headers: &[String], side: &HeaderIndex) -> Vec<String> {
    headers
        .iter()
        .map(|h| if side.contains(h) { h.clone() } else { String::new() })
        .collect()
}

/// Diffs untabulated lines, appends one row per line and returns the number
/// of deleted and added lines.
///
/// Each row is compared as a single line: its cells with trailing empties
/// dropped, joined by tabs.
fn diff_lines(rows: &mut Vec<DiffRow>, old: &[Vec<String>], new: &[Vec<String>], width: usize) -> usize {
    let old_lines: Vec<String> = old.iter().map(|r| join_line(r)).collect();
    let new_lines: Vec<String> = new.iter().map(|r| join_line(r)).collect();

    let mut changes = 0;
    for segment in diff_sequences(&old_lines, &new_lines) {
        for line in segment.items {
            let mut cells: Vec<String> = line.split('\t').take(width).map(str::to_string).collect();
            cells.resize(width, String::new());
            rows.push(DiffRow::new(segment.tag.into(), cells));
            if segment.tag != Tag::Same {
                changes += 1;
            }
        }
    }
    changes
}

fn join_line(cells: &[String]) -> String {
    let len = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |j| j + 1);
    cells[..len].join("\t")
}
