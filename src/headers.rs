//! Column reconciliation.
//!
//! Merges the old and new header rows into one ordered union. The union
//! follows the new column order; a deleted column is placed right after the
//! column that preceded it in the old table, and deleted columns that lead
//! the old table (before any surviving column) come first.

use crate::error::DiffError;
use crate::lcs::Tag;
use crate::table::{HeaderIndex, Side};

/// The reconciled header list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDiff {
    /// Union of old and new header names, in display order
    pub headers: Vec<String>,
    /// One tag per entry in `headers`
    pub tags: Vec<Tag>,
    /// Lookup for the old header row
    pub old: HeaderIndex,
    /// Lookup for the new header row
    pub new: HeaderIndex,
}

impl HeaderDiff {
    /// Returns true if no column was added or deleted.
    pub fn is_unchanged(&self) -> bool {
        self.tags.iter().all(|t| *t == Tag::Same)
    }

    /// Headers present in both tables.
    pub fn common(&self) -> impl Iterator<Item = &String> {
        self.headers
            .iter()
            .zip(&self.tags)
            .filter(|(_, tag)| **tag == Tag::Same)
            .map(|(h, _)| h)
    }
}

/// Reconciles `old_headers` with `new_headers`.
///
/// # Errors
///
/// Returns [`DiffError::MalformedHeaders`] if either side has an empty or
/// duplicate header name.
///
/// # Examples
///
/// ```
/// use tablediff_rs::headers::reconcile_headers;
/// use tablediff_rs::lcs::Tag;
///
/// let old = vec!["ID".to_string(), "Color".to_string(), "Size".to_string()];
/// let new = vec!["ID".to_string(), "Color".to_string()];
/// let diff = reconcile_headers(&old, &new).unwrap();
///
/// assert_eq!(diff.headers, vec!["ID", "Color", "Size"]);
/// assert_eq!(diff.tags, vec![Tag::Same, Tag::Same, Tag::Deleted]);
/// ```
pub fn reconcile_headers(
    old_headers: &[String],
    new_headers: &[String],
) -> Result<HeaderDiff, DiffError> {
    let old = HeaderIndex::build(Side::Old, old_headers)?;
    let new = HeaderIndex::build(Side::New, new_headers)?;

    let mut headers = Vec::with_capacity(old.len() + new.len());
    let mut tags = Vec::with_capacity(old.len() + new.len());

    for h in old_headers.iter().take_while(|h| !new.contains(h)) {
        headers.push(h.clone());
        tags.push(Tag::Deleted);
    }

    for h in new_headers {
        headers.push(h.clone());
        match old.position(h) {
            Some(j) => {
                tags.push(Tag::Same);
                for deleted in old_headers[j + 1..]
                    .iter()
                    .take_while(|d| !new.contains(d))
                {
                    headers.push(deleted.clone());
                    tags.push(Tag::Deleted);
                }
            }
            None => tags.push(Tag::Added),
        }
    }

    debug_assert_eq!(headers.len(), tags.len());
    log::debug!(
        "reconciled {} old and {} new headers into {}",
        old.len(),
        new.len(),
        headers.len()
    );

    Ok(HeaderDiff {
        headers,
        tags,
        old,
        new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leading_deleted_columns_come_first() {
        let diff = reconcile_headers(&names(&["A", "B", "ID"]), &names(&["ID", "C"])).unwrap();
        assert_eq!(diff.headers, names(&["A", "B", "ID", "C"]));
        assert_eq!(
            diff.tags,
            vec![Tag::Deleted, Tag::Deleted, Tag::Same, Tag::Added]
        );
    }

    #[test]
    fn test_deleted_column_follows_old_predecessor_after_reorder() {
        let old = names(&["ID", "Color", "Size", "Price"]);
        let new = names(&["Price", "ID", "Color"]);
        let diff = reconcile_headers(&old, &new).unwrap();
        assert_eq!(diff.headers, names(&["Price", "ID", "Color", "Size"]));
        assert_eq!(diff.tags[3], Tag::Deleted);
    }

    #[test]
    fn test_union_has_no_duplicates() {
        let old = names(&["k", "a", "b", "c", "d"]);
        let new = names(&["d", "x", "k", "b", "y"]);
        let diff = reconcile_headers(&old, &new).unwrap();
        let union: HashSet<&String> = old.iter().chain(new.iter()).collect();
        let seen: HashSet<&String> = diff.headers.iter().collect();
        assert_eq!(diff.headers.len(), union.len());
        assert_eq!(seen, union);
    }

    #[test]
    fn test_common_headers() {
        let diff = reconcile_headers(&names(&["ID", "A"]), &names(&["ID", "B"])).unwrap();
        let common: Vec<&String> = diff.common().collect();
        assert_eq!(common, vec!["ID"]);
        assert!(!diff.is_unchanged());
    }
}
