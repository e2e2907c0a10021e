//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the aggregation queries
//! - exported to JSON/CSV
//! - rendered by either front-end (CLI report or TUI)

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column labels of the source dataset (運動現況調查, data.gov.tw #24375).
///
/// The CSV ships with native-language headers; we look columns up by these
/// literal labels rather than by position.
pub const COL_YEAR: &str = "統計年度";
pub const COL_SOURCE: &str = "資料來源";
pub const COL_TARGET: &str = "分析標的";
pub const COL_CONTENT: &str = "分析內容";
pub const COL_ITEM: &str = "統計項目";
pub const COL_ITEM_LABEL: &str = "統計項目說明";
pub const COL_VALUE: &str = "分析結果值";
pub const COL_UNIT: &str = "分析結果單位";

/// All required header columns, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_YEAR,
    COL_SOURCE,
    COL_TARGET,
    COL_CONTENT,
    COL_ITEM,
    COL_ITEM_LABEL,
    COL_VALUE,
    COL_UNIT,
];

/// Unit substituted when `分析結果單位` is absent.
pub const DEFAULT_UNIT: &str = "百分比";

/// One statistical observation.
///
/// There is no primary key; a record's identity is its position in the
/// dataset. The whole list is replaced on reload, never mutated in place.
///
/// Serialized field names are the native column labels so JSON exports match
/// the source data model exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportRecord {
    /// Statistical year label, kept as text (e.g. ROC-era "107").
    #[serde(rename = "統計年度")]
    pub year: String,
    #[serde(rename = "資料來源")]
    pub source: String,
    /// Level-1 analysis category (e.g. 規律運動比例).
    #[serde(rename = "分析標的")]
    pub target: String,
    /// Level-2 analysis category, meaningful only within a target.
    #[serde(rename = "分析內容")]
    pub content: String,
    #[serde(rename = "統計項目")]
    pub item: String,
    /// Human-readable breakdown label; carries the gender split here.
    #[serde(rename = "統計項目說明")]
    pub item_label: String,
    /// Measured result. Lenient ingestion may leave this as `NAN`.
    #[serde(rename = "分析結果值")]
    pub value: f64,
    #[serde(rename = "分析結果單位")]
    pub unit: String,
}

impl SportRecord {
    pub fn breakdown(&self) -> Breakdown {
        Breakdown::from_label(&self.item_label)
    }
}

/// Gender breakdown carried in `統計項目說明`.
///
/// The chart plots exactly the three recognized variants; anything else maps
/// to `Other` so new categories are observable instead of silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakdown {
    Male,
    Female,
    Overall,
    Other,
}

impl Breakdown {
    /// The three variants that appear as chart series.
    pub const CHARTED: [Breakdown; 3] = [Breakdown::Male, Breakdown::Female, Breakdown::Overall];

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "男" => Breakdown::Male,
            "女" => Breakdown::Female,
            "整體" => Breakdown::Overall,
            _ => Breakdown::Other,
        }
    }

    /// Native label used in headers and exports.
    pub fn display_name(self) -> &'static str {
        match self {
            Breakdown::Male => "男",
            Breakdown::Female => "女",
            Breakdown::Overall => "整體",
            Breakdown::Other => "其他",
        }
    }
}

/// Row filtering applied during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop (and report) rows whose year is empty or whose value is empty or
    /// unparseable. Used for the fetched default dataset.
    Strict,
    /// Keep every row, coercing an unparseable value to `NAN`. Used for
    /// user-supplied files so nothing disappears without being seen.
    Lenient,
}

/// Explicit ordering key for year labels.
///
/// Labels that parse as unsigned integers compare numerically and sort before
/// non-numeric labels; non-numeric labels compare lexically among themselves.
/// This keeps mixed-width ROC-era labels in order ("99" < "107"), which plain
/// lexical comparison would get wrong.
pub fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
