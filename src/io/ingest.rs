//! CSV ingest and normalization.
//!
//! This module turns the raw statistics CSV into a clean list of
//! `SportRecord`s that the aggregation queries can rely on.
//!
//! Design goals:
//! - **Strict schema** for the required native-label columns (clear errors)
//! - **Row-level reporting** (dropped rows are recorded, not silently lost)
//! - **One normalizer, two modes**: the strict/lenient split is an explicit
//!   `ParseMode`, not two divergent code paths
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{
    COL_CONTENT, COL_ITEM, COL_ITEM_LABEL, COL_SOURCE, COL_TARGET, COL_UNIT, COL_VALUE, COL_YEAR,
    DEFAULT_UNIT, ParseMode, REQUIRED_COLUMNS, SportRecord,
};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
///
/// `line` is the 1-based CSV line number (headers are line 1).
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized records + row errors + counters.
///
/// An empty `records` list is a valid outcome, not an error; callers decide
/// how to present an empty dataset.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<SportRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a CSV file to `SportRecord`s.
pub fn load_records_from_path(path: &Path, mode: ParseMode) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_records(file, mode)
}

/// Normalize CSV from any byte stream (file or fetched response body).
pub fn read_records(input: impl Read, mode: ParseMode) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match normalize_row(&raw, &header_map, mode) {
            Ok(record) => records.push(record),
            // Strict-mode drops land here so the row is recorded, not lost.
            Err(e) => row_errors.push(RowError { line, message: e }),
        }
    }

    let rows_used = records.len();
    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿統計年度"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::config(format!(
        "Missing required column(s): {}",
        missing.join(", ")
    )))
}

fn normalize_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    mode: ParseMode,
) -> Result<SportRecord, String> {
    let year = get_text(record, header_map, COL_YEAR);
    let raw_value = get_optional(record, header_map, COL_VALUE);

    if mode == ParseMode::Strict {
        if year.is_empty() {
            return Err(format!("Missing `{COL_YEAR}` value."));
        }
        let Some(raw) = raw_value else {
            return Err(format!("Missing `{COL_VALUE}` value."));
        };
        if parse_finite_f64(raw).is_none() {
            return Err(format!("Invalid `{COL_VALUE}` value '{raw}'."));
        }
    }

    // Lenient mode mirrors the permissive upload behavior: every row is kept
    // and an unparseable value becomes NAN so the record stays visible.
    let value = raw_value
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(f64::NAN);

    let unit = get_optional(record, header_map, COL_UNIT)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());

    Ok(SportRecord {
        year,
        source: get_text(record, header_map, COL_SOURCE),
        target: get_text(record, header_map, COL_TARGET),
        content: get_text(record, header_map, COL_CONTENT),
        item: get_text(record, header_map, COL_ITEM),
        item_label: get_text(record, header_map, COL_ITEM_LABEL),
        value,
        unit,
    })
}

/// Text field: verbatim copy, empty string when absent.
fn get_text(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> String {
    get_optional(record, header_map, name)
        .unwrap_or_default()
        .to_string()
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_finite_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "統計年度,資料來源,分析標的,分析內容,統計項目,統計項目說明,分析結果值,分析結果單位";

    fn ingest(body: &str, mode: ParseMode) -> IngestedData {
        read_records(body.as_bytes(), mode).unwrap()
    }

    #[test]
    fn round_trip_fully_populated_row() {
        let csv = format!(
            "{HEADER}\n107,運動現況調查,規律運動比例,散步/走路/健走,7333,男,60.5,百分比\n"
        );
        let data = ingest(&csv, ParseMode::Strict);

        assert_eq!(data.rows_read, 1);
        assert_eq!(data.rows_used, 1);
        assert!(data.row_errors.is_empty());

        let r = &data.records[0];
        assert_eq!(r.year, "107");
        assert_eq!(r.source, "運動現況調查");
        assert_eq!(r.target, "規律運動比例");
        assert_eq!(r.content, "散步/走路/健走");
        assert_eq!(r.item, "7333");
        assert_eq!(r.item_label, "男");
        assert!((r.value - 60.5).abs() < 1e-12);
        assert_eq!(r.unit, "百分比");
    }

    #[test]
    fn unit_defaults_when_absent() {
        let csv = format!("{HEADER}\n107,src,t,c,i,男,60.5,\n");
        let data = ingest(&csv, ParseMode::Strict);
        assert_eq!(data.records[0].unit, DEFAULT_UNIT);
    }

    #[test]
    fn strict_drops_row_missing_value_and_reports_it() {
        let csv = format!("{HEADER}\n107,src,t,c,i,男,,百分比\n108,src,t,c,i,女,55.2,百分比\n");
        let data = ingest(&csv, ParseMode::Strict);

        assert_eq!(data.rows_read, 2);
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.records[0].year, "108");
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 2);
    }

    #[test]
    fn strict_drops_row_with_unparseable_value() {
        let csv = format!("{HEADER}\n107,src,t,c,i,男,abc,百分比\n");
        let data = ingest(&csv, ParseMode::Strict);
        assert!(data.records.is_empty());
        assert_eq!(data.row_errors.len(), 1);
    }

    #[test]
    fn strict_drops_row_missing_year() {
        let csv = format!("{HEADER}\n,src,t,c,i,男,60.5,百分比\n");
        let data = ingest(&csv, ParseMode::Strict);
        assert!(data.records.is_empty());
        assert_eq!(data.row_errors.len(), 1);
    }

    #[test]
    fn lenient_keeps_row_missing_value_as_nan() {
        let csv = format!("{HEADER}\n107,src,t,c,i,男,,百分比\n");
        let data = ingest(&csv, ParseMode::Lenient);

        assert_eq!(data.rows_used, 1);
        assert!(data.row_errors.is_empty());
        assert!(data.records[0].value.is_nan());
    }

    #[test]
    fn lenient_keeps_unparseable_value_as_nan() {
        let csv = format!("{HEADER}\n107,src,t,c,i,男,n/a,百分比\n");
        let data = ingest(&csv, ParseMode::Lenient);
        assert!(data.records[0].value.is_nan());
    }

    #[test]
    fn absent_text_fields_normalize_to_empty_string() {
        let csv = format!("{HEADER}\n107,,,,,,60.5,百分比\n");
        let data = ingest(&csv, ParseMode::Lenient);
        let r = &data.records[0];
        assert_eq!(r.source, "");
        assert_eq!(r.target, "");
        assert_eq!(r.item_label, "");
    }

    #[test]
    fn header_bom_is_stripped() {
        let csv = format!("\u{feff}{HEADER}\n107,src,t,c,i,男,60.5,百分比\n");
        let data = ingest(&csv, ParseMode::Strict);
        assert_eq!(data.rows_used, 1);
        assert_eq!(data.records[0].year, "107");
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let csv = "分析結果值,統計年度,資料來源,分析標的,分析內容,統計項目,統計項目說明,分析結果單位\n\
                   60.5,107,src,t,c,i,男,百分比\n";
        let data = ingest(csv, ParseMode::Strict);
        assert_eq!(data.records[0].year, "107");
        assert!((data.records[0].value - 60.5).abs() < 1e-12);
    }

    #[test]
    fn missing_required_column_is_a_config_error() {
        let csv = "統計年度,資料來源\n107,src\n";
        let err = read_records(csv.as_bytes(), ParseMode::Strict).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("分析結果值"));
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let csv = format!("{HEADER}\n");
        let data = ingest(&csv, ParseMode::Strict);
        assert!(data.records.is_empty());
        assert_eq!(data.rows_read, 0);
    }
}
