//! Output formatting for diff results.
//!
//! This module renders a [`DiffResult`] as coloured terminal output, as plain
//! tab-separated text, or as JSON. It owns all presentation decisions: which
//! colour a row or column gets, and whether unchanged rows are shown. The
//! reconciliation core carries no presentation state.
//!
//! # Examples
//!
//! ```
//! use tablediff_rs::{compute_diff, format_diff, DiffConfig, OutputFormat, OutputOptions, Table};
//!
//! let grid = |rows: &[&[&str]]| -> Vec<Vec<String>> {
//!     rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
//! };
//! let old = Table::new(grid(&[&["ID", "Color"], &["1", "Red"]]), 0, "ID");
//! let new = Table::new(grid(&[&["ID", "Color"], &["1", "Blue"]]), 0, "ID");
//! let diff = compute_diff(&old, &new, &DiffConfig::default()).unwrap();
//!
//! let output = format_diff(&diff, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("c-\t1\tRed"));
//! assert!(output.contains("c+\t1\tBlue"));
//! ```

use crate::diff::{DiffResult, DiffRow, RowTag, Zone};
use crate::error::OutputError;
use crate::lcs::Tag;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Coloured terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the diff
    Json,
    /// Tab-separated grid, no colours (suitable for piping)
    Plain,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Hide unchanged body rows
    pub compact: bool,
    /// Columns that were excluded from comparison; rendered dimmed
    pub ignore_headers: Vec<String>,
}

/// Formats a diff according to the specified format and options.
///
/// # Errors
///
/// Returns `OutputError::JsonSerializationError` if JSON serialization fails.
pub fn format_diff(
    diff: &DiffResult,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_terminal(diff, options)),
        OutputFormat::Json => format_json(diff, options),
        OutputFormat::Plain => Ok(format_plain(diff, options)),
    }
}

/// Formats a diff for terminal output with colours.
///
/// Colour scheme:
/// - Deleted rows and columns: red
/// - Added rows and columns: green
/// - Changed rows: yellow, with the differing cells in bold
/// - Header rows: bold
/// - Ignored columns and comment rows: dimmed
fn format_terminal(diff: &DiffResult, options: &OutputOptions) -> String {
    let mut output = String::new();

    for (i, row) in visible_rows(diff, options) {
        let zone = diff.zone(i);
        let partner = changed_partner(diff, i);

        let cells: Vec<String> = row
            .cells
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                let highlight = partner.is_some_and(|p| p.cells.get(j) != Some(cell));
                style_cell(cell, row.tag, column_style(diff, options, zone, j), highlight)
            })
            .collect();

        let marker = style_marker(row.tag, zone);
        output.push_str(&format!("{:<2} {}", marker, cells.join(" | ")));
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_summary(diff));

    output
}

/// Formats a diff as a tab-separated grid, marker column first.
fn format_plain(diff: &DiffResult, options: &OutputOptions) -> String {
    let mut output = String::new();

    for (_, row) in visible_rows(diff, options) {
        output.push_str(row.tag.marker());
        for cell in &row.cells {
            output.push('\t');
            output.push_str(cell);
        }
        output.push('\n');
    }

    output
}

/// Formats a diff as JSON.
///
/// The JSON structure includes the headers with their tags, the zone
/// boundaries, the rows and the change count. Zone boundaries index into the
/// emitted rows, which differ from the grid when `compact` hides rows.
fn format_json(diff: &DiffResult, options: &OutputOptions) -> Result<String, OutputError> {
    use serde_json::json;

    let (indices, rows): (Vec<usize>, Vec<&DiffRow>) = visible_rows(diff, options).unzip();
    let boundary = |start: usize| indices.partition_point(|&i| i < start);

    let output = json!({
        "headers": diff.headers,
        "header_tags": diff.header_tags,
        "ignored": options.ignore_headers,
        "zones": {
            "header": boundary(diff.header_start),
            "body": boundary(diff.body_start),
            "postamble": boundary(diff.postamble_start),
        },
        "rows": rows,
        "changes": diff.changes,
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

/// Rows to display with their grid index, honouring `compact`.
fn visible_rows<'a>(
    diff: &'a DiffResult,
    options: &'a OutputOptions,
) -> impl Iterator<Item = (usize, &'a DiffRow)> + 'a {
    diff.rows
        .iter()
        .enumerate()
        .filter(move |(i, row)| {
            !(options.compact && row.tag == RowTag::Same && diff.zone(*i) == Zone::Body)
        })
}

/// For a row of a changed pair, the other row of the pair.
fn changed_partner(diff: &DiffResult, i: usize) -> Option<&DiffRow> {
    if diff.zone(i) != Zone::Body {
        return None;
    }
    match diff.rows[i].tag {
        RowTag::ChangedOld => diff.rows.get(i + 1),
        RowTag::ChangedNew => i.checked_sub(1).and_then(|p| diff.rows.get(p)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnStyle {
    Plain,
    Added,
    Deleted,
    Ignored,
}

/// Column colouring applies to the header and body zones only.
fn column_style(diff: &DiffResult, options: &OutputOptions, zone: Zone, j: usize) -> ColumnStyle {
    if !matches!(zone, Zone::Header | Zone::Body) {
        return ColumnStyle::Plain;
    }
    match diff.header_tags.get(j) {
        Some(Tag::Added) => ColumnStyle::Added,
        Some(Tag::Deleted) => ColumnStyle::Deleted,
        _ if options
            .ignore_headers
            .iter()
            .any(|h| diff.headers.get(j) == Some(h)) =>
        {
            ColumnStyle::Ignored
        }
        _ => ColumnStyle::Plain,
    }
}

fn style_cell(cell: &str, tag: RowTag, column: ColumnStyle, highlight: bool) -> String {
    let styled = match column {
        ColumnStyle::Added => cell.green(),
        ColumnStyle::Deleted => cell.red(),
        ColumnStyle::Ignored => cell.dimmed(),
        ColumnStyle::Plain => match tag {
            RowTag::Deleted => cell.red(),
            RowTag::Added => cell.green(),
            RowTag::ChangedOld | RowTag::ChangedNew => cell.yellow(),
            RowTag::Comment => cell.dimmed(),
            RowTag::Same => cell.normal(),
        },
    };
    if highlight {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}

fn style_marker(tag: RowTag, zone: Zone) -> String {
    let marker = tag.marker();
    let styled = match tag {
        RowTag::Deleted => marker.bright_red(),
        RowTag::Added => marker.bright_green(),
        RowTag::ChangedOld | RowTag::ChangedNew => marker.bright_yellow(),
        RowTag::Comment => marker.dimmed(),
        RowTag::Same => marker.normal(),
    };
    if zone == Zone::Header {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}

/// Formats summary statistics.
fn format_summary(diff: &DiffResult) -> String {
    if diff.is_empty() {
        return "Summary: No changes".to_string();
    }

    let body = diff.body();
    let count = |tag: RowTag| body.iter().filter(|r| r.tag == tag).count();
    let columns = |tag: Tag| diff.header_tags.iter().filter(|t| **t == tag).count();

    let mut parts = Vec::new();
    for (n, label) in [
        (count(RowTag::Added), "rows added"),
        (count(RowTag::Deleted), "rows deleted"),
        (count(RowTag::ChangedOld), "rows changed"),
        (columns(Tag::Added), "columns added"),
        (columns(Tag::Deleted), "columns deleted"),
    ] {
        if n > 0 {
            parts.push(format!("{} {}", n, label));
        }
    }

    let total = if diff.changes == 1 {
        "1 difference".to_string()
    } else {
        format!("{} differences", diff.changes)
    };
    if parts.is_empty() {
        format!("Summary: {}", total)
    } else {
        format!("Summary: {} ({})", total, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{compute_diff, DiffConfig};
    use crate::table::Table;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sample() -> DiffResult {
        let old = Table::new(
            grid(&[&["ID", "Color", "Size"], &["1", "Red", "S"], &["2", "Tan", "M"]]),
            0,
            "ID",
        );
        let new = Table::new(
            grid(&[&["ID", "Color"], &["1", "Blue"], &["3", "Gold"]]),
            0,
            "ID",
        );
        compute_diff(&old, &new, &DiffConfig::default()).unwrap()
    }

    #[test]
    fn test_format_summary_no_changes() {
        let table = Table::new(grid(&[&["ID"], &["1"]]), 0, "ID");
        let diff = compute_diff(&table, &table, &DiffConfig::default()).unwrap();
        assert_eq!(format_summary(&diff), "Summary: No changes");
    }

    #[test]
    fn test_format_summary_with_changes() {
        let summary = format_summary(&sample());
        assert!(summary.contains("1 rows added"));
        assert!(summary.contains("1 rows deleted"));
        assert!(summary.contains("1 rows changed"));
        assert!(summary.contains("1 columns deleted"));
    }

    #[test]
    fn test_changed_partner() {
        let diff = sample();
        let i = diff
            .rows
            .iter()
            .position(|r| r.tag == RowTag::ChangedNew)
            .unwrap();
        assert_eq!(changed_partner(&diff, i).unwrap().tag, RowTag::ChangedOld);
        assert!(changed_partner(&diff, diff.header_start).is_none());
    }

    #[test]
    fn test_column_style_only_in_table_zones() {
        let diff = sample();
        let options = OutputOptions::default();
        assert_eq!(column_style(&diff, &options, Zone::Body, 2), ColumnStyle::Deleted);
        assert_eq!(column_style(&diff, &options, Zone::Preamble, 2), ColumnStyle::Plain);
    }

    #[test]
    fn test_plain_compact_hides_same_rows() {
        let table = Table::new(grid(&[&["ID"], &["1"]]), 0, "ID");
        let diff = compute_diff(&table, &table, &DiffConfig::default()).unwrap();
        let options = OutputOptions {
            compact: true,
            ..Default::default()
        };
        assert_eq!(format_plain(&diff, &options), "=\tID\n");
    }

    #[test]
    fn test_format_json() {
        let output = format_json(&sample(), &OutputOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["changes"], serde_json::json!(diff_changes()));
        assert_eq!(value["header_tags"][2], "deleted");
        assert_eq!(value["rows"][0]["tag"], "c-");
    }

    #[test]
    fn test_format_json_compact_zones() {
        let old = Table::new(
            grid(&[&["ID", "V"], &["1", "a"], &["2", "b"], &["", "tail"]]),
            0,
            "ID",
        );
        let new = Table::new(
            grid(&[&["ID", "V"], &["1", "a"], &["2", "B"], &["", "tail2"]]),
            0,
            "ID",
        );
        let diff = compute_diff(&old, &new, &DiffConfig::default()).unwrap();
        let options = OutputOptions {
            compact: true,
            ..Default::default()
        };
        let output = format_json(&diff, &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["zones"]["header"], 0);
        assert_eq!(value["zones"]["body"], 1);
        assert_eq!(value["zones"]["postamble"], 3);
        assert_eq!(value["rows"][3]["tag"], "-");
    }

    fn diff_changes() -> usize {
        sample().changes
    }
}
