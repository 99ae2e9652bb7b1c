//! Row reconciliation.
//!
//! Merges the old and new table bodies into one ordered list of [`DiffRow`]s.
//! Rows are matched by key, never by position. The output follows the new
//! row order; a deleted row is placed right after the row that preceded it in
//! the old body, and deleted rows leading the old body come first.

use crate::diff::{DiffRow, RowTag};
use crate::error::DiffError;
use crate::headers::HeaderDiff;
use crate::table::{HeaderIndex, Side};
use std::collections::{BTreeSet, HashMap, HashSet};

/// One side's table body, as seen by the row reconciler.
#[derive(Debug, Clone, Copy)]
pub struct BodyView<'a> {
    pub side: Side,
    /// Body rows only (no header, preamble or postamble)
    pub rows: &'a [Vec<String>],
    /// 0-based index of `rows[0]` in the full table, for error messages
    pub first_row: usize,
    /// Name of the key column
    pub key: &'a str,
}

/// The reconciled body and the number of differences found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyDiff {
    pub rows: Vec<DiffRow>,
    pub changes: usize,
}

struct KeyedBody<'a> {
    view: BodyView<'a>,
    headers: &'a HeaderIndex,
    keys: Vec<&'a str>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> KeyedBody<'a> {
    fn build(view: BodyView<'a>, headers: &'a HeaderIndex) -> Result<Self, DiffError> {
        let j_key = headers
            .position(view.key)
            .ok_or_else(|| DiffError::KeyColumnNotFound {
                side: view.side,
                key: view.key.to_string(),
            })?;

        let mut keys = Vec::with_capacity(view.rows.len());
        let mut positions = HashMap::with_capacity(view.rows.len());
        for (i, row) in view.rows.iter().enumerate() {
            let key = row.get(j_key).map(String::as_str).unwrap_or_default();
            let row_number = view.first_row + i + 1;
            if key.is_empty() {
                return Err(DiffError::EmptyKey {
                    side: view.side,
                    row: row_number,
                });
            }
            if positions.insert(key, i).is_some() {
                return Err(DiffError::DuplicateKey {
                    side: view.side,
                    row: row_number,
                    key: key.to_string(),
                });
            }
            keys.push(key);
        }

        Ok(Self {
            view,
            headers,
            keys,
            positions,
        })
    }

    fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    fn aligned(&self, i: usize, diff_headers: &[String]) -> Vec<String> {
        self.headers.row(&self.view.rows[i]).aligned(diff_headers)
    }
}

/// Reconciles the old and new bodies against the reconciled header list.
///
/// Columns named in `ignore_headers` are shown but left out of the equality
/// test that decides whether a matched row changed.
///
/// # Errors
///
/// - [`DiffError::KeyColumnNotFound`] if a key column is not in its header row
/// - [`DiffError::EmptyKey`] or [`DiffError::DuplicateKey`] for invalid keys
/// - [`DiffError::UnknownIgnoreColumn`] if an ignored column is not common to
///   both tables
pub fn reconcile_rows(
    old: BodyView<'_>,
    new: BodyView<'_>,
    headers: &HeaderDiff,
    ignore_headers: &[String],
) -> Result<BodyDiff, DiffError> {
    let old = KeyedBody::build(old, &headers.old)?;
    let new = KeyedBody::build(new, &headers.new)?;

    let common: HashSet<&str> = headers.common().map(String::as_str).collect();
    let unknown: BTreeSet<&String> = ignore_headers
        .iter()
        .filter(|h| !common.contains(h.as_str()))
        .collect();
    if !unknown.is_empty() {
        return Err(DiffError::UnknownIgnoreColumn {
            columns: unknown.into_iter().cloned().collect(),
        });
    }
    let compared: Vec<&str> = headers
        .common()
        .map(String::as_str)
        .filter(|h| !ignore_headers.iter().any(|i| i.as_str() == *h))
        .collect();

    let diff_headers = &headers.headers;
    let mut rows = Vec::with_capacity(old.keys.len().max(new.keys.len()));

    for i in (0..old.keys.len()).take_while(|&i| !new.contains(old.keys[i])) {
        rows.push(DiffRow::new(RowTag::Deleted, old.aligned(i, diff_headers)));
    }

    for (inew, key) in new.keys.iter().enumerate() {
        let mut candidate = new.aligned(inew, diff_headers);

        let Some(&iold) = old.positions.get(key) else {
            rows.push(DiffRow::new(RowTag::Added, candidate));
            continue;
        };

        let old_row = old.headers.row(&old.view.rows[iold]);
        let new_row = new.headers.row(&new.view.rows[inew]);

        for (cell, h) in candidate.iter_mut().zip(diff_headers) {
            if !new.headers.contains(h) {
                if let Some(v) = old_row.get(h) {
                    *cell = v.to_string();
                }
            }
        }

        if compared.iter().all(|h| old_row.get(h) == new_row.get(h)) {
            rows.push(DiffRow::new(RowTag::Same, candidate));
        } else {
            let before = diff_headers
                .iter()
                .map(|h| {
                    old_row
                        .get(h)
                        .or_else(|| new_row.get(h))
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            rows.push(DiffRow::new(RowTag::ChangedOld, before));
            rows.push(DiffRow::new(RowTag::ChangedNew, candidate));
        }

        for i in (iold + 1..old.keys.len()).take_while(|&i| !new.contains(old.keys[i])) {
            rows.push(DiffRow::new(RowTag::Deleted, old.aligned(i, diff_headers)));
        }
    }

    let changes = count_changes(&rows);
    log::debug!(
        "reconciled {} old and {} new body rows into {} diff rows, {} changes",
        old.keys.len(),
        new.keys.len(),
        rows.len(),
        changes
    );

    Ok(BodyDiff { rows, changes })
}

/// Counts one change per added or deleted row, and one per differing cell
/// of each changed pair.
fn count_changes(rows: &[DiffRow]) -> usize {
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row.tag {
            RowTag::Added | RowTag::Deleted => 1,
            RowTag::ChangedOld => rows.get(i + 1).map_or(0, |next| row.differing_cells(next)),
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::reconcile_headers;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn body<'a>(side: Side, rows: &'a [Vec<String>]) -> BodyView<'a> {
        BodyView {
            side,
            rows,
            first_row: 1,
            key: "ID",
        }
    }

    #[test]
    fn test_deleted_row_follows_old_predecessor() {
        let headers = grid(&[&["ID", "V"]]);
        let diff = reconcile_headers(&headers[0], &headers[0]).unwrap();
        let old = grid(&[&["1", "a"], &["2", "b"], &["3", "c"]]);
        let new = grid(&[&["3", "c"], &["1", "a"]]);

        let result = reconcile_rows(body(Side::Old, &old), body(Side::New, &new), &diff, &[]).unwrap();
        let keys: Vec<(&str, RowTag)> = result
            .rows
            .iter()
            .map(|r| (r.cells[0].as_str(), r.tag))
            .collect();
        assert_eq!(
            keys,
            vec![("3", RowTag::Same), ("1", RowTag::Same), ("2", RowTag::Deleted)]
        );
        assert_eq!(result.changes, 1);
    }

    #[test]
    fn test_old_only_column_kept_for_matched_rows() {
        let old_headers = grid(&[&["ID", "Color", "Size"]]);
        let new_headers = grid(&[&["ID", "Color"]]);
        let diff = reconcile_headers(&old_headers[0], &new_headers[0]).unwrap();
        let old = grid(&[&["1", "Red", "Small"]]);
        let new = grid(&[&["1", "Red"]]);

        let result = reconcile_rows(body(Side::Old, &old), body(Side::New, &new), &diff, &[]).unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].tag, RowTag::Same);
        assert_eq!(result.rows[0].cells, vec!["1", "Red", "Small"]);
        assert_eq!(result.changes, 0);
    }

    #[test]
    fn test_changed_old_row_shows_new_only_columns() {
        let old_headers = grid(&[&["ID", "Color"]]);
        let new_headers = grid(&[&["ID", "Color", "Weight"]]);
        let diff = reconcile_headers(&old_headers[0], &new_headers[0]).unwrap();
        let old = grid(&[&["1", "Red"]]);
        let new = grid(&[&["1", "Blue", "3kg"]]);

        let result = reconcile_rows(body(Side::Old, &old), body(Side::New, &new), &diff, &[]).unwrap();
        assert_eq!(result.rows[0].tag, RowTag::ChangedOld);
        assert_eq!(result.rows[0].cells, vec!["1", "Red", "3kg"]);
        assert_eq!(result.rows[1].tag, RowTag::ChangedNew);
        assert_eq!(result.rows[1].cells, vec!["1", "Blue", "3kg"]);
        assert_eq!(result.changes, 1);
    }

    #[test]
    fn test_duplicate_key_reports_table_row() {
        let headers = grid(&[&["ID", "V"]]);
        let diff = reconcile_headers(&headers[0], &headers[0]).unwrap();
        let old = grid(&[&["1", "a"], &["1", "b"]]);
        let new = grid(&[&["1", "a"]]);

        let err = reconcile_rows(body(Side::Old, &old), body(Side::New, &new), &diff, &[]).unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicateKey {
                side: Side::Old,
                row: 3,
                key: "1".to_string(),
            }
        );
    }
}
