//! Time-series projections for the chart and the table.

use serde::Serialize;

use crate::domain::{Breakdown, SportRecord, compare_years};

/// One chart point: a year plus up to three gender values.
///
/// An absent breakdown for a year is `None`, never zero. Lenient ingestion
/// can surface `Some(NAN)` here; the chart renderer treats non-finite values
/// as gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    #[serde(rename = "統計年度")]
    pub year: String,
    #[serde(rename = "男")]
    pub male: Option<f64>,
    #[serde(rename = "女")]
    pub female: Option<f64>,
    #[serde(rename = "整體")]
    pub overall: Option<f64>,
}

impl TimeSeriesPoint {
    fn new(year: String) -> Self {
        Self {
            year,
            male: None,
            female: None,
            overall: None,
        }
    }

    pub fn value_for(&self, breakdown: Breakdown) -> Option<f64> {
        match breakdown {
            Breakdown::Male => self.male,
            Breakdown::Female => self.female,
            Breakdown::Overall => self.overall,
            Breakdown::Other => None,
        }
    }

    fn set(&mut self, breakdown: Breakdown, value: f64) {
        match breakdown {
            Breakdown::Male => self.male = Some(value),
            Breakdown::Female => self.female = Some(value),
            Breakdown::Overall => self.overall = Some(value),
            Breakdown::Other => {}
        }
    }
}

/// One table row: the year-ordered projection of a matching record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    #[serde(rename = "統計年度")]
    pub year: String,
    #[serde(rename = "統計項目說明")]
    pub item_label: String,
    #[serde(rename = "分析結果值")]
    pub value: f64,
    #[serde(rename = "分析結果單位")]
    pub unit: String,
}

/// Chart series for a `(target, content)` pair.
///
/// Filters by exact string equality, groups by year, splits each year by the
/// recognized gender breakdowns (rows with an unrecognized `統計項目說明` are
/// excluded from the chart), and sorts ascending by the explicit year key.
/// A duplicate (year, breakdown) pair keeps the last value seen.
pub fn time_series(records: &[SportRecord], target: &str, content: &str) -> Vec<TimeSeriesPoint> {
    let mut points: Vec<TimeSeriesPoint> = Vec::new();

    for record in matching(records, target, content) {
        let breakdown = record.breakdown();
        if breakdown == Breakdown::Other {
            continue;
        }

        let idx = match points.iter().position(|p| p.year == record.year) {
            Some(idx) => idx,
            None => {
                points.push(TimeSeriesPoint::new(record.year.clone()));
                points.len() - 1
            }
        };
        points[idx].set(breakdown, record.value);
    }

    points.sort_by(|a, b| compare_years(&a.year, &b.year));
    points
}

/// Table projection for a `(target, content)` pair.
///
/// One output row per matching record (not deduplicated or grouped), in
/// ascending year order; the stable sort keeps same-year rows in dataset
/// order. `統計項目說明`, `分析結果值`, `分析結果單位` pass through unchanged.
pub fn time_series_table(records: &[SportRecord], target: &str, content: &str) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = matching(records, target, content)
        .map(|record| TableRow {
            year: record.year.clone(),
            item_label: record.item_label.clone(),
            value: record.value,
            unit: record.unit.clone(),
        })
        .collect();

    rows.sort_by(|a, b| compare_years(&a.year, &b.year));
    rows
}

fn matching<'a>(
    records: &'a [SportRecord],
    target: &'a str,
    content: &'a str,
) -> impl Iterator<Item = &'a SportRecord> {
    records
        .iter()
        .filter(move |r| r.target == target && r.content == content)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        year: &str,
        target: &str,
        content: &str,
        item_label: &str,
        value: f64,
    ) -> SportRecord {
        SportRecord {
            year: year.to_string(),
            source: "運動現況調查".to_string(),
            target: target.to_string(),
            content: content.to_string(),
            item: String::new(),
            item_label: item_label.to_string(),
            value,
            unit: "百分比".to_string(),
        }
    }

    #[test]
    fn two_years_each_with_a_single_breakdown() {
        let records = vec![
            record("107", "規律運動比例", "散步/走路/健走", "男", 60.5),
            record("108", "規律運動比例", "散步/走路/健走", "女", 55.2),
        ];

        assert_eq!(crate::analysis::analysis_targets(&records), vec!["規律運動比例"]);

        let series = time_series(&records, "規律運動比例", "散步/走路/健走");
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].year, "107");
        assert_eq!(series[0].male, Some(60.5));
        assert_eq!(series[0].female, None);
        assert_eq!(series[0].overall, None);

        assert_eq!(series[1].year, "108");
        assert_eq!(series[1].male, None);
        assert_eq!(series[1].female, Some(55.2));
    }

    #[test]
    fn series_excludes_non_matching_pairs() {
        let records = vec![
            record("107", "t", "c", "男", 1.0),
            record("107", "t", "other", "男", 2.0),
            record("107", "other", "c", "男", 3.0),
        ];

        let series = time_series(&records, "t", "c");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].male, Some(1.0));

        let rows = time_series_table(&records, "t", "c");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 1.0);
    }

    #[test]
    fn filter_is_case_sensitive_exact_equality() {
        let records = vec![record("107", "Target", "c", "男", 1.0)];
        assert!(time_series(&records, "target", "c").is_empty());
        assert!(time_series_table(&records, "TARGET", "c").is_empty());
    }

    #[test]
    fn one_point_per_year_with_three_way_split() {
        let records = vec![
            record("107", "t", "c", "男", 60.5),
            record("107", "t", "c", "女", 55.2),
            record("107", "t", "c", "整體", 57.8),
            record("108", "t", "c", "整體", 58.1),
        ];

        let series = time_series(&records, "t", "c");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].male, Some(60.5));
        assert_eq!(series[0].female, Some(55.2));
        assert_eq!(series[0].overall, Some(57.8));
        assert_eq!(series[1].male, None);
        assert_eq!(series[1].overall, Some(58.1));
    }

    #[test]
    fn unrecognized_breakdown_excluded_from_chart_but_kept_in_table() {
        let records = vec![
            record("107", "t", "c", "65歲以上", 12.3),
            record("107", "t", "c", "男", 60.5),
        ];

        let series = time_series(&records, "t", "c");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].male, Some(60.5));

        let rows = time_series_table(&records, "t", "c");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_label, "65歲以上");
    }

    #[test]
    fn points_ascend_by_year_even_with_mixed_width_labels() {
        let records = vec![
            record("107", "t", "c", "男", 1.0),
            record("99", "t", "c", "男", 2.0),
            record("108", "t", "c", "男", 3.0),
        ];

        let series = time_series(&records, "t", "c");
        let years: Vec<&str> = series.iter().map(|p| p.year.as_str()).collect();
        assert_eq!(years, vec!["99", "107", "108"]);
    }

    #[test]
    fn point_count_is_distinct_years_row_count_is_matches() {
        let records = vec![
            record("107", "t", "c", "男", 1.0),
            record("107", "t", "c", "女", 2.0),
            record("108", "t", "c", "男", 3.0),
        ];

        assert_eq!(time_series(&records, "t", "c").len(), 2);
        assert_eq!(time_series_table(&records, "t", "c").len(), 3);
    }

    #[test]
    fn table_rows_sorted_by_year_with_stable_same_year_order() {
        let records = vec![
            record("108", "t", "c", "男", 3.0),
            record("107", "t", "c", "女", 2.0),
            record("107", "t", "c", "男", 1.0),
        ];

        let rows = time_series_table(&records, "t", "c");
        assert_eq!(rows[0].year, "107");
        assert_eq!(rows[0].item_label, "女");
        assert_eq!(rows[1].item_label, "男");
        assert_eq!(rows[2].year, "108");
    }

    #[test]
    fn duplicate_year_breakdown_keeps_last_value() {
        let records = vec![
            record("107", "t", "c", "男", 1.0),
            record("107", "t", "c", "男", 9.0),
        ];

        let series = time_series(&records, "t", "c");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].male, Some(9.0));
    }

    #[test]
    fn empty_input_never_errors() {
        assert!(time_series(&[], "t", "c").is_empty());
        assert!(time_series_table(&[], "t", "c").is_empty());
    }
}
