//! Export the computed series and the normalized dataset.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; both use the native column labels of the source data.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analysis::TimeSeriesPoint;
use crate::domain::{Breakdown, SportRecord};
use crate::error::AppError;

/// Write the chart series to CSV.
///
/// Missing breakdown values become empty cells, not zeros, so the export
/// round-trips through the lenient ingest path.
pub fn write_series_csv(path: &Path, points: &[TimeSeriesPoint]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create series CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(
        file,
        "統計年度,{},{},{}",
        Breakdown::Male.display_name(),
        Breakdown::Female.display_name(),
        Breakdown::Overall.display_name(),
    )
    .map_err(|e| AppError::config(format!("Failed to write series CSV header: {e}")))?;

    for p in points {
        writeln!(
            file,
            "{},{},{},{}",
            p.year,
            fmt_cell(p.male),
            fmt_cell(p.female),
            fmt_cell(p.overall),
        )
        .map_err(|e| AppError::config(format!("Failed to write series CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the normalized dataset as pretty JSON (native-label keys).
pub fn write_records_json(path: &Path, records: &[SportRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create JSON export '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, records)
        .map_err(|e| AppError::config(format!("Failed to write JSON export: {e}")))?;

    Ok(())
}

fn fmt_cell(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_cell_blanks_missing_and_non_finite() {
        assert_eq!(fmt_cell(None), "");
        assert_eq!(fmt_cell(Some(f64::NAN)), "");
        assert_eq!(fmt_cell(Some(60.5)), "60.5");
    }
}
