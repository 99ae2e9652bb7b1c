//! tablediff - key-based diff for tabular data.
//!
//! This library reconciles two versions of a table, matching rows by a key
//! column and columns by header name rather than by position. Lines above and
//! below the table are compared separately as text.
//!
//! # Example
//!
//! ```no_run
//! use tablediff_rs::{compute_diff, format_diff, load_table, DiffConfig, LoadOptions, OutputFormat, OutputOptions};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load both tables, keyed by the ID column
//! let options = LoadOptions::new("ID");
//! let old = load_table(Path::new("old.csv"), &options)?;
//! let new = load_table(Path::new("new.csv"), &options)?;
//!
//! // Reconcile them
//! let diff = compute_diff(&old, &new, &DiffConfig::default())?;
//!
//! // Format the output
//! let output = format_diff(&diff, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod error;
pub mod headers;
pub mod lcs;
pub mod loader;
pub mod output;
pub mod rows;
pub mod table;

// Re-export commonly used types for convenience
pub use diff::{compute_diff, DiffConfig, DiffResult, DiffRow, RowTag, Zone};
pub use error::{DiffError, HeaderProblem, LoadError, OutputError, TableDiffError};
pub use headers::{reconcile_headers, HeaderDiff};
pub use lcs::{diff_sequences, Segment, Tag};
pub use loader::{load_table, LoadOptions};
pub use output::{format_diff, OutputFormat, OutputOptions};
pub use rows::{reconcile_rows, BodyDiff, BodyView};
pub use table::{HeaderIndex, Row, Side, Table};
