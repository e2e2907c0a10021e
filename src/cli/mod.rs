//! Command-line parsing for the sport-statistics viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data-processing code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ParseMode;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sportviz",
    version,
    about = "臺灣運動現況統計資料 — terminal viewer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (chart + table + cascading selectors).
    ///
    /// This is the default when no subcommand is given.
    Tui(DataArgs),
    /// Print the distinct analysis targets (分析標的).
    Targets(DataArgs),
    /// Print the time-series points for a target/content pair.
    Series(QueryArgs),
    /// Print the year-ordered table projection for a target/content pair.
    Table(QueryArgs),
}

/// Where the dataset comes from and how strictly it is ingested.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Load a local CSV file instead of fetching the default dataset.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Choose a CSV file interactively from the current directory tree.
    #[arg(long, conflicts_with = "file")]
    pub pick: bool,

    /// Override the default dataset URL (also: SPORTVIZ_DATA_URL env var).
    #[arg(long)]
    pub url: Option<String>,

    /// Row filtering: defaults to strict for fetched data, lenient for files.
    #[arg(long, value_enum)]
    pub mode: Option<ParseMode>,
}

/// Options for the scripted series/table queries.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Analysis target (分析標的); defaults to the first available.
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Analysis content (分析內容); defaults to the first under the target.
    #[arg(short = 'c', long)]
    pub content: Option<String>,

    /// Export the computed series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the normalized dataset to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
