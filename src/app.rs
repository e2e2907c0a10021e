//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset (remote fetch or local CSV)
//! - answers the scripted queries (targets/series/table)
//! - launches the TUI

use clap::Parser;

use crate::analysis::{
    analysis_contents_by_target, analysis_targets, time_series, time_series_table,
};
use crate::cli::{Command, DataArgs, QueryArgs};
use crate::domain::SportRecord;
use crate::error::AppError;

pub mod load;
pub mod state;

/// Entry point for the `sportviz` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sportviz` and `sportviz -f data.csv` to behave like
    // `sportviz tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Targets(args) => handle_targets(args),
        Command::Series(args) => handle_query(args, QueryKind::Series),
        Command::Table(args) => handle_query(args, QueryKind::Table),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Series,
    Table,
}

fn handle_targets(args: DataArgs) -> Result<(), AppError> {
    let loaded = load::load_from_args(&args)?;
    println!(
        "{}",
        crate::report::format_load_summary(&loaded.origin, &loaded.ingest)
    );
    println!(
        "{}",
        crate::report::format_targets(&analysis_targets(&loaded.ingest.records))
    );
    Ok(())
}

fn handle_query(args: QueryArgs, kind: QueryKind) -> Result<(), AppError> {
    let loaded = load::load_from_args(&args.data)?;
    let records = &loaded.ingest.records;

    println!(
        "{}",
        crate::report::format_load_summary(&loaded.origin, &loaded.ingest)
    );

    let Some((target, content)) = resolve_query(records, args.target, args.content) else {
        println!("No data available; nothing to query.");
        return Ok(());
    };
    let title = format!("{target} - {content}");

    match kind {
        QueryKind::Series => {
            let points = time_series(records, &target, &content);
            println!("{}", crate::report::format_series(&title, &points));
        }
        QueryKind::Table => {
            let rows = time_series_table(records, &target, &content);
            println!("{}", crate::report::format_table(&title, &rows));
        }
    }

    if let Some(path) = &args.export {
        let points = time_series(records, &target, &content);
        crate::io::export::write_series_csv(path, &points)?;
        println!("Wrote series CSV: {}", path.display());
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_records_json(path, records)?;
        println!("Wrote dataset JSON: {}", path.display());
    }

    Ok(())
}

/// Fill in missing target/content with the first available values,
/// mirroring the initial selection of the interactive UI.
fn resolve_query(
    records: &[SportRecord],
    target: Option<String>,
    content: Option<String>,
) -> Option<(String, String)> {
    let target = target.or_else(|| analysis_targets(records).into_iter().next())?;
    let content =
        content.or_else(|| analysis_contents_by_target(records, &target).into_iter().next())?;
    Some((target, content))
}

/// Rewrite argv so `sportviz` defaults to `sportviz tui`.
///
/// Rules:
/// - `sportviz`                    -> `sportviz tui`
/// - `sportviz -f data.csv ...`    -> `sportviz tui -f data.csv ...`
/// - `sportviz --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "targets" | "series" | "table");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
