//! Formatted terminal output for targets, series, and table queries.

use crate::analysis::{TableRow, TimeSeriesPoint};
use crate::domain::Breakdown;
use crate::io::ingest::IngestedData;

/// One-line ingest summary printed before query output.
pub fn format_load_summary(origin: &str, data: &IngestedData) -> String {
    let mut out = format!(
        "Loaded {} record(s) from {} ({} row(s) read",
        data.rows_used, origin, data.rows_read
    );
    if !data.row_errors.is_empty() {
        out.push_str(&format!(", {} skipped/invalid", data.row_errors.len()));
    }
    out.push(')');
    out
}

/// Numbered list of analysis targets.
pub fn format_targets(targets: &[String]) -> String {
    if targets.is_empty() {
        return "No analysis targets available.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Analysis targets (分析標的):\n");
    for (idx, target) in targets.iter().enumerate() {
        out.push_str(&format!("{:>3}) {target}\n", idx + 1));
    }
    out
}

/// Year-by-year chart series as an aligned text table.
pub fn format_series(title: &str, points: &[TimeSeriesPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title} - 隨時間變化趨勢\n"));

    if points.is_empty() {
        out.push_str("No data for this selection.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:>10} {:>10} {:>10}\n",
        "年度",
        Breakdown::Male.display_name(),
        Breakdown::Female.display_name(),
        Breakdown::Overall.display_name(),
    ));
    out.push_str(&format!("{:-<10} {:-<10} {:-<10} {:-<10}\n", "", "", "", ""));

    for p in points {
        out.push_str(&format!(
            "{:<10} {:>10} {:>10} {:>10}\n",
            p.year,
            fmt_opt_value(p.male),
            fmt_opt_value(p.female),
            fmt_opt_value(p.overall),
        ));
    }
    out
}

/// Flat year-ordered projection rows.
pub fn format_table(title: &str, rows: &[TableRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title} - 歷年數據\n"));

    if rows.is_empty() {
        out.push_str("No data for this selection.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:<24} {:>10} {:<10}\n",
        "年度", "統計項目說明", "數值", "單位"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<24} {:-<10} {:-<10}\n",
        "", "", "", ""
    ));

    for row in rows {
        out.push_str(&format!(
            "{:<10} {:<24} {:>10} {:<10}\n",
            row.year,
            truncate(&row.item_label, 24),
            fmt_value(row.value),
            row.unit,
        ));
    }
    out
}

/// Missing breakdown → "-"; lenient-mode NAN also renders as "-".
fn fmt_opt_value(v: Option<f64>) -> String {
    match v {
        Some(v) => fmt_value(v),
        None => "-".to_string(),
    }
}

fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1}")
    } else {
        "-".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_renders_missing_values_as_dash() {
        let points = vec![TimeSeriesPoint {
            year: "107".to_string(),
            male: Some(60.5),
            female: None,
            overall: Some(f64::NAN),
        }];

        let text = format_series("規律運動比例 - 散步/走路/健走", &points);
        assert!(text.contains("107"));
        assert!(text.contains("60.5"));
        // female missing and overall NAN both render as "-"
        assert!(text.matches(" -").count() >= 2);
    }

    #[test]
    fn empty_results_render_a_message_not_nothing() {
        assert!(format_series("t - c", &[]).contains("No data"));
        assert!(format_table("t - c", &[]).contains("No data"));
        assert!(format_targets(&[]).contains("No analysis targets"));
    }

    #[test]
    fn table_passes_values_through() {
        let rows = vec![TableRow {
            year: "108".to_string(),
            item_label: "女".to_string(),
            value: 55.2,
            unit: "百分比".to_string(),
        }];

        let text = format_table("t - c", &rows);
        assert!(text.contains("108"));
        assert!(text.contains("55.2"));
        assert!(text.contains("百分比"));
    }

    #[test]
    fn truncate_is_char_safe_for_cjk() {
        assert_eq!(truncate("散步/走路/健走", 24), "散步/走路/健走");
        assert_eq!(truncate("一二三四五", 3), "一二.");
    }
}
