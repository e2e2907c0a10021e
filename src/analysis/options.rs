//! Distinct filter options, in first-occurrence order.
//!
//! The UI presents two cascading selectors: 分析標的 (level 1) and, within a
//! target, 分析內容 (level 2). First-seen order is deliberate: it mirrors the
//! ordering of the published dataset rather than imposing a collation.

use std::collections::HashSet;

use crate::domain::SportRecord;

/// Distinct `分析標的` values, first-occurrence order, no duplicates.
pub fn analysis_targets(records: &[SportRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        if seen.insert(record.target.as_str()) {
            out.push(record.target.clone());
        }
    }
    out
}

/// Distinct `分析內容` values among records matching `target` exactly.
///
/// Unknown targets yield an empty list.
pub fn analysis_contents_by_target(records: &[SportRecord], target: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records.iter().filter(|r| r.target == target) {
        if seen.insert(record.content.as_str()) {
            out.push(record.content.clone());
        }
    }
    out
}
