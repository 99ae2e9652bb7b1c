//! Loading tables from delimited text files.
//!
//! Reads CSV or TSV into a [`Table`], normalising cells the way the
//! reconciler expects: trimmed, tab-free and rectangular, with trailing
//! empty rows and columns removed.
//!
//! # Examples
//!
//! ```no_run
//! use tablediff_rs::loader::{load_table, LoadOptions};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LoadOptions::new("ID");
//! let table = load_table(Path::new("inventory.csv"), &options)?;
//! println!("{} body rows", table.body().len());
//! # Ok(())
//! # }
//! ```

use crate::error::LoadError;
use crate::table::Table;
use std::fs;
use std::path::Path;

/// How to locate the table inside a file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Key column name
    pub key: String,
    /// 1-based header row; when `None` the first row containing `key` is used
    pub header_row: Option<usize>,
    /// Cells after this many columns are dropped before the grid is squared up
    pub max_columns: Option<usize>,
}

impl LoadOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header_row: None,
            max_columns: None,
        }
    }

    pub fn with_header_row(mut self, header_row: Option<usize>) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_max_columns(mut self, max_columns: Option<usize>) -> Self {
        self.max_columns = max_columns;
        self
    }
}

/// Field delimiter, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn for_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("tsv") | Some("tab") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    fn byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Loads a table from `path`.
///
/// # Errors
///
/// - `LoadError::FileNotFound` if the file does not exist
/// - `LoadError::ReadError` if the file cannot be read
/// - `LoadError::CsvError` if the content is not valid delimited text
/// - `LoadError::EmptyTable` if no non-empty cell is found
/// - `LoadError::HeaderRowNotFound` / `HeaderRowOutOfRange` if the header
///   row cannot be located
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let display = path.to_string_lossy().to_string();
    if !path.exists() {
        return Err(LoadError::file_not_found(display));
    }

    let content = fs::read_to_string(path).map_err(|e| LoadError::read_error(&display, e))?;
    log::info!("Reading file: '{}'", display);

    let rows = parse_rows(&content, Delimiter::for_path(path))
        .map_err(|e| LoadError::csv_error(&display, e))?;
    let rows = match options.max_columns {
        Some(max_columns) => truncate_columns(rows, max_columns, &display),
        None => rows,
    };
    let rows = normalize_rows(rows);
    if rows.is_empty() {
        return Err(LoadError::empty_table(display));
    }

    let header_row = match options.header_row {
        Some(0) => {
            return Err(LoadError::HeaderRowOutOfRange {
                path: display,
                row: 0,
                rows: rows.len(),
            })
        }
        Some(n) if n > rows.len() => {
            return Err(LoadError::HeaderRowOutOfRange {
                path: display,
                row: n,
                rows: rows.len(),
            })
        }
        Some(n) => n - 1,
        None => find_header_row(&rows, &options.key)
            .ok_or_else(|| LoadError::header_row_not_found(&display, &options.key))?,
    };

    let table = Table::new(rows, header_row, options.key.as_str());
    log::info!(
        "In '{}' found table in rows {}-{} columns 1-{}",
        display,
        table.header_row + 1,
        table.body_end,
        table.headers().len()
    );
    Ok(table)
}

/// Parses delimited text into raw rows of cells.
pub fn parse_rows(content: &str, delimiter: Delimiter) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.byte())
        .from_reader(content.as_bytes());

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

/// Drops every cell after the first `max_columns` of each row.
pub fn truncate_columns(mut rows: Vec<Vec<String>>, max_columns: usize, path: &str) -> Vec<Vec<String>> {
    let mut dropped = 0;
    for row in &mut rows {
        if row.len() > max_columns {
            dropped += row[max_columns..]
                .iter()
                .filter(|c| !c.trim().is_empty())
                .count();
            row.truncate(max_columns);
        }
    }
    if dropped > 0 {
        log::warn!(
            "'{}': dropped {} non-empty cell(s) beyond column {}",
            path,
            dropped,
            max_columns
        );
    }
    rows
}

/// Trims cells, replaces tabs with spaces, drops trailing empty rows and
/// columns, and pads every row to the same width.
pub fn normalize_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.trim().replace('\t', " "))
                .collect()
        })
        .collect();

    let width = rows
        .iter()
        .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
        .max()
        .map_or(0, |j| j + 1);
    let height = rows
        .iter()
        .rposition(|row| row.iter().any(|c| !c.is_empty()))
        .map_or(0, |i| i + 1);

    rows.truncate(height);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

/// Returns the first row that has a cell equal to `key`.
pub fn find_header_row(rows: &[Vec<String>], key: &str) -> Option<usize> {
    rows.iter().position(|row| row.iter().any(|c| c == key))
}
