//! Custom error types for tablediff.

use crate::table::Side;

/// Why a header row was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderProblem {
    Empty,
    Duplicate(String),
}

impl std::fmt::Display for HeaderProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderProblem::Empty => write!(f, "empty header"),
            HeaderProblem::Duplicate(name) => write!(f, "duplicate header '{}'", name),
        }
    }
}

/// Input-validation failures raised by the reconciliation core.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("Malformed headers in {side} table: {reason} in column {column}")]
    MalformedHeaders {
        side: Side,
        column: usize,
        reason: HeaderProblem,
    },

    #[error("Table in {side} file contains an empty key at row {row}")]
    EmptyKey { side: Side, row: usize },

    #[error("Table in {side} file contains a duplicate key on row {row}: '{key}'")]
    DuplicateKey { side: Side, row: usize, key: String },

    #[error("Bad --ignore column name(s): {}. Ignored columns must exist in both old and new tables", .columns.join(" "))]
    UnknownIgnoreColumn { columns: Vec<String> },

    #[error("Key column '{key}' not found in {side} header row")]
    KeyColumnNotFound { side: Side, key: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid delimited text in {path}: {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("No table data in {path}")]
    EmptyTable { path: String },

    #[error("Unable to find header row with key '{key}' in {path}")]
    HeaderRowNotFound { path: String, key: String },

    #[error("Header row {row} is out of range in {path} ({rows} rows)")]
    HeaderRowOutOfRange {
        path: String,
        row: usize,
        rows: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output to {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TableDiffError {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl LoadError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn csv_error(path: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvError {
            path: path.into(),
            source,
        }
    }

    pub fn empty_table(path: impl Into<String>) -> Self {
        Self::EmptyTable { path: path.into() }
    }

    pub fn header_row_not_found(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self::HeaderRowNotFound {
            path: path.into(),
            key: key.into(),
        }
    }
}
