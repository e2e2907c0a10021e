//! Shared dataset-loading logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve source -> ingest (strict/lenient) -> hand records to the caller.
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use crate::cli::{DataArgs, picker};
use crate::data::DatasetClient;
use crate::domain::ParseMode;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_records_from_path};

/// A loaded dataset plus where it came from (for headers and summaries).
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub ingest: IngestedData,
    pub origin: String,
    pub mode: ParseMode,
}

/// Resolve the dataset source from CLI flags and load it.
///
/// Files ingest leniently and fetches strictly unless `--mode` says
/// otherwise, mirroring the upload/fetch split of the original system.
pub fn load_from_args(args: &DataArgs) -> Result<LoadedDataset, AppError> {
    if args.pick {
        let path = picker::prompt_for_csv_path()?;
        return load_file(&path, args.mode.unwrap_or(ParseMode::Lenient));
    }
    if let Some(path) = &args.file {
        let path = picker::validate_csv_path(path)?;
        return load_file(&path, args.mode.unwrap_or(ParseMode::Lenient));
    }

    let client = match &args.url {
        Some(url) => DatasetClient::with_url(url.clone()),
        None => DatasetClient::from_env(),
    };
    fetch_default(&client, args.mode.unwrap_or(ParseMode::Strict))
}

pub fn load_file(path: &Path, mode: ParseMode) -> Result<LoadedDataset, AppError> {
    let ingest = load_records_from_path(path, mode)?;
    Ok(LoadedDataset {
        ingest,
        origin: picker::pretty_path(path),
        mode,
    })
}

pub fn fetch_default(client: &DatasetClient, mode: ParseMode) -> Result<LoadedDataset, AppError> {
    let ingest = client.fetch_dataset(mode)?;
    Ok(LoadedDataset {
        ingest,
        origin: client.url().to_string(),
        mode,
    })
}
