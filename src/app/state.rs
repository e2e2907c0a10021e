//! In-memory application state.
//!
//! The dataset is a single immutable list replaced wholesale on every load;
//! `replace_dataset` is the only mutation entry point, and every mutation is
//! followed by the same derivation step: reconcile the cascading selection
//! against the values actually present in the new data.

use crate::analysis::{
    TableRow, TimeSeriesPoint, analysis_contents_by_target, analysis_targets, time_series,
    time_series_table,
};
use crate::domain::SportRecord;

/// Current cascading selection: a level-1 target and a level-2 content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub target: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    records: Vec<SportRecord>,
    selection: Selection,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SportRecord] {
        &self.records
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Swap in a freshly ingested dataset.
    ///
    /// A still-valid selection is kept so reloading an updated file doesn't
    /// yank the user's place; an invalidated one falls back to the first
    /// available value, and an empty dataset clears it.
    pub fn replace_dataset(&mut self, records: Vec<SportRecord>) {
        self.records = records;
        self.reconcile_selection();
    }

    pub fn select_target(&mut self, target: String) {
        self.selection.target = Some(target);
        self.reconcile_selection();
    }

    pub fn select_content(&mut self, content: String) {
        self.selection.content = Some(content);
        self.reconcile_selection();
    }

    fn reconcile_selection(&mut self) {
        let targets = self.targets();
        self.selection.target = reconcile(self.selection.target.take(), &targets);

        let contents = self.contents();
        self.selection.content = reconcile(self.selection.content.take(), &contents);
    }

    pub fn targets(&self) -> Vec<String> {
        analysis_targets(&self.records)
    }

    /// Contents available under the currently selected target.
    pub fn contents(&self) -> Vec<String> {
        match &self.selection.target {
            Some(target) => analysis_contents_by_target(&self.records, target),
            None => Vec::new(),
        }
    }

    pub fn chart_points(&self) -> Vec<TimeSeriesPoint> {
        match (&self.selection.target, &self.selection.content) {
            (Some(target), Some(content)) => time_series(&self.records, target, content),
            _ => Vec::new(),
        }
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        match (&self.selection.target, &self.selection.content) {
            (Some(target), Some(content)) => time_series_table(&self.records, target, content),
            _ => Vec::new(),
        }
    }

    /// `分析標的 - 分析內容` heading for the chart/table panes.
    pub fn selection_title(&self) -> Option<String> {
        match (&self.selection.target, &self.selection.content) {
            (Some(target), Some(content)) => Some(format!("{target} - {content}")),
            _ => None,
        }
    }
}

fn reconcile(current: Option<String>, available: &[String]) -> Option<String> {
    match current {
        Some(value) if available.contains(&value) => Some(value),
        _ => available.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: &str, target: &str, content: &str) -> SportRecord {
        SportRecord {
            year: year.to_string(),
            source: String::new(),
            target: target.to_string(),
            content: content.to_string(),
            item: String::new(),
            item_label: "整體".to_string(),
            value: 50.0,
            unit: "百分比".to_string(),
        }
    }

    #[test]
    fn replace_dataset_defaults_to_first_available_pair() {
        let mut state = AppState::new();
        state.replace_dataset(vec![
            record("107", "t1", "c1"),
            record("107", "t1", "c2"),
            record("107", "t2", "c3"),
        ]);

        assert_eq!(state.selection().target.as_deref(), Some("t1"));
        assert_eq!(state.selection().content.as_deref(), Some("c1"));
    }

    #[test]
    fn replace_dataset_keeps_still_valid_selection() {
        let mut state = AppState::new();
        state.replace_dataset(vec![record("107", "t1", "c1"), record("107", "t2", "c3")]);
        state.select_target("t2".to_string());
        assert_eq!(state.selection().content.as_deref(), Some("c3"));

        state.replace_dataset(vec![record("108", "t1", "c1"), record("108", "t2", "c3")]);
        assert_eq!(state.selection().target.as_deref(), Some("t2"));
        assert_eq!(state.selection().content.as_deref(), Some("c3"));
    }

    #[test]
    fn replace_dataset_resets_invalidated_selection() {
        let mut state = AppState::new();
        state.replace_dataset(vec![record("107", "t1", "c1")]);
        assert_eq!(state.selection().target.as_deref(), Some("t1"));

        state.replace_dataset(vec![record("107", "tX", "cX")]);
        assert_eq!(state.selection().target.as_deref(), Some("tX"));
        assert_eq!(state.selection().content.as_deref(), Some("cX"));
    }

    #[test]
    fn empty_dataset_clears_selection() {
        let mut state = AppState::new();
        state.replace_dataset(vec![record("107", "t1", "c1")]);
        state.replace_dataset(Vec::new());

        assert_eq!(state.selection(), &Selection::default());
        assert!(state.targets().is_empty());
        assert!(state.chart_points().is_empty());
        assert!(state.table_rows().is_empty());
    }

    #[test]
    fn selecting_target_cascades_to_valid_content() {
        let mut state = AppState::new();
        state.replace_dataset(vec![record("107", "t1", "c1"), record("107", "t2", "c3")]);

        state.select_target("t2".to_string());
        assert_eq!(state.selection().content.as_deref(), Some("c3"));
    }
}
