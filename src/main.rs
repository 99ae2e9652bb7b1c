//! tablediff command-line interface.
//!
//! This is the main entry point for the tablediff CLI tool. It uses clap for
//! argument parsing and wires together the loader, the reconciler and the
//! output formatter.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tablediff_rs::{
    compute_diff, format_diff, load_table, DiffConfig, LoadOptions, OutputFormat, OutputOptions,
    TableDiffError,
};

/// tablediff - Key-based diff tool for tabular data
///
/// Compares two versions of a table, matching rows by key and columns by
/// header name, so reordering rows or columns is not reported as a change.
/// Lines above and below the table are compared separately as text.
#[derive(Parser)]
#[command(name = "tablediff-rs")]
#[command(version)]
#[command(about = "Key-based diff tool for tabular data", long_about = None)]
struct Cli {
    /// Old table (CSV, or TSV by .tsv/.tab extension)
    #[arg(value_name = "OLD_FILE")]
    old_file: PathBuf,

    /// New table (CSV, or TSV by .tsv/.tab extension)
    #[arg(value_name = "NEW_FILE")]
    new_file: PathBuf,

    /// Key column that uniquely identifies rows in both tables
    #[arg(short, long)]
    key: String,

    /// Key column of the old table, if named differently
    #[arg(long)]
    old_key: Option<String>,

    /// Key column of the new table, if named differently
    #[arg(long)]
    new_key: Option<String>,

    /// Column to show but exclude from comparison (repeatable)
    #[arg(short, long = "ignore", value_name = "COLUMN")]
    ignore: Vec<String>,

    /// 1-based header row in both files (default: first row containing the key)
    #[arg(long)]
    header_row: Option<usize>,

    /// 1-based header row in the old file
    #[arg(long)]
    old_header_row: Option<usize>,

    /// 1-based header row in the new file
    #[arg(long)]
    new_header_row: Option<usize>,

    /// Drop columns after N before locating the table (0 = no limit)
    #[arg(long, value_name = "N", default_value_t = 100)]
    max_columns: usize,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Hide unchanged rows
    #[arg(short, long)]
    compact: bool,

    /// Print the keys of deleted, added and changed rows instead of the diff
    #[arg(long, conflicts_with = "union_keys")]
    changed: bool,

    /// Print the keys of all rows, old and new, instead of the diff
    #[arg(long)]
    union_keys: bool,

    /// Do not echo the command line as the first output row
    #[arg(long)]
    no_comment: bool,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Verbose output (show loading progress)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (no error message, exit status only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Coloured terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Tab-separated grid (no colours)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));

    let quiet = cli.quiet;
    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            if !quiet {
                eprintln!("Error: {:#}", err);
            }
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let old_key = cli.old_key.clone().unwrap_or_else(|| cli.key.clone());
    let new_key = cli.new_key.clone().unwrap_or_else(|| cli.key.clone());

    let max_columns = (cli.max_columns > 0).then_some(cli.max_columns);
    let old_options = LoadOptions::new(&old_key)
        .with_header_row(cli.old_header_row.or(cli.header_row))
        .with_max_columns(max_columns);
    let new_options = LoadOptions::new(&new_key)
        .with_header_row(cli.new_header_row.or(cli.header_row))
        .with_max_columns(max_columns);

    let old = load_table(&cli.old_file, &old_options)
        .with_context(|| format!("Failed to load old file: {}", cli.old_file.display()))?;
    let new = load_table(&cli.new_file, &new_options)
        .with_context(|| format!("Failed to load new file: {}", cli.new_file.display()))?;

    let diff_config = DiffConfig {
        ignore_headers: cli.ignore.clone(),
        comment: (!cli.no_comment).then(command_line),
    };

    log::info!("Computing diff...");
    let diff = compute_diff(&old, &new, &diff_config).map_err(TableDiffError::from)?;

    let output = if cli.changed || cli.union_keys {
        let mut lines = vec![new_key.clone()];
        lines.extend(
            diff.changed_keys(&new_key, cli.union_keys)
                .into_iter()
                .map(str::to_string),
        );
        lines.push(String::new());
        lines.join("\n")
    } else {
        let output_options = OutputOptions {
            compact: cli.compact,
            ignore_headers: cli.ignore.clone(),
        };
        let output_format: OutputFormat = cli.format.into();
        format_diff(&diff, &output_format, &output_options)
            .context("Failed to format diff output")?
    };

    match &cli.out {
        Some(path) => write_output(path, &output)?,
        None => print!("{}", output),
    }

    if diff.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    fs::write(path, output).map_err(|e| {
        TableDiffError::from(tablediff_rs::OutputError::WriteError {
            path: path.display().to_string(),
            source: e,
        })
    })?;
    log::info!("Wrote: '{}'", path.display());
    Ok(())
}

/// The invocation, program name reduced to its basename.
fn command_line() -> String {
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(program) = args.first_mut() {
        let name = Path::new(program.as_str())
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        if let Some(name) = name {
            *program = name;
        }
    }
    args.join(" ")
}
