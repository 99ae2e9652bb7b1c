//! Longest-common-substring sequence differ.
//!
//! Aligns two sequences around their longest shared run, then repeats the
//! search on the pieces before and after that run. The result is a list of
//! [`Segment`]s such that the `Same` and `Deleted` segments concatenate back
//! to `old`, and the `Same` and `Added` segments concatenate back to `new`.
//!
//! # Examples
//!
//! ```
//! use tablediff_rs::lcs::{diff_sequences, Tag};
//!
//! let old = [1, 2, 3, 4];
//! let new = [1, 3, 4];
//! let segments = diff_sequences(&old, &new);
//!
//! let tags: Vec<Tag> = segments.iter().map(|s| s.tag).collect();
//! assert_eq!(tags, vec![Tag::Same, Tag::Deleted, Tag::Same]);
//! assert_eq!(segments[2].items, &[3, 4]);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// How a run of items relates old to new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Present in both sequences
    Same,
    /// Present only in old
    Deleted,
    /// Present only in new
    Added,
}

impl Tag {
    /// The one-character marker used in rendered output.
    pub fn marker(&self) -> &'static str {
        match self {
            Tag::Same => "=",
            Tag::Deleted => "-",
            Tag::Added => "+",
        }
    }
}

/// A run of consecutive items sharing one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a, T> {
    pub tag: Tag,
    pub items: &'a [T],
}

enum Step<'a, T> {
    Diff(Range<usize>, Range<usize>),
    Emit(Segment<'a, T>),
}

/// Diffs `old` against `new`.
///
/// Uses an explicit work list instead of recursion, so very long inputs with
/// few common items cannot exhaust the stack. Ties between equally long
/// common runs go to the one ending first in `new`.
pub fn diff_sequences<'a, T: Eq + Hash>(old: &'a [T], new: &'a [T]) -> Vec<Segment<'a, T>> {
    let mut segments = Vec::new();
    let mut work = vec![Step::Diff(0..old.len(), 0..new.len())];

    while let Some(step) = work.pop() {
        let (old_range, new_range) = match step {
            Step::Emit(segment) => {
                segments.push(segment);
                continue;
            }
            Step::Diff(o, n) => (o, n),
        };

        let old_part = &old[old_range.clone()];
        let new_part = &new[new_range.clone()];

        match longest_common_run(old_part, new_part) {
            None => {
                if !old_part.is_empty() {
                    segments.push(Segment {
                        tag: Tag::Deleted,
                        items: old_part,
                    });
                }
                if !new_part.is_empty() {
                    segments.push(Segment {
                        tag: Tag::Added,
                        items: new_part,
                    });
                }
            }
            Some((start_old, start_new, len)) => {
                let o = old_range.start;
                let n = new_range.start;
                // Pushed in reverse so they pop in output order.
                work.push(Step::Diff(
                    o + start_old + len..old_range.end,
                    n + start_new + len..new_range.end,
                ));
                work.push(Step::Emit(Segment {
                    tag: Tag::Same,
                    items: &new[n + start_new..n + start_new + len],
                }));
                work.push(Step::Diff(o..o + start_old, n..n + start_new));
            }
        }
    }

    segments
}

/// Finds the longest run shared by `old` and `new`.
///
/// Returns `(start_in_old, start_in_new, length)`, or `None` when the two
/// sequences have no item in common.
fn longest_common_run<T: Eq + Hash>(old: &[T], new: &[T]) -> Option<(usize, usize, usize)> {
    let mut old_positions: HashMap<&T, Vec<usize>> = HashMap::new();
    for (i, item) in old.iter().enumerate() {
        old_positions.entry(item).or_default().push(i);
    }

    // overlap[iold] = length of the common run ending at old[iold] and the
    // previous new item.
    let mut overlap: HashMap<usize, usize> = HashMap::new();
    let mut best: Option<(usize, usize, usize)> = None;

    for (inew, item) in new.iter().enumerate() {
        let mut next_overlap = HashMap::new();
        if let Some(positions) = old_positions.get(item) {
            for &iold in positions {
                let run = if iold == 0 {
                    1
                } else {
                    overlap.get(&(iold - 1)).copied().unwrap_or(0) + 1
                };
                next_overlap.insert(iold, run);
                if best.map_or(true, |(_, _, len)| run > len) {
                    best = Some((iold + 1 - run, inew + 1 - run, run));
                }
            }
        }
        overlap = next_overlap;
    }

    best
}
