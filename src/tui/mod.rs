//! Ratatui-based terminal UI.
//!
//! The TUI shows the loaded dataset as two cascading selectors (分析標的 /
//! 分析內容), a gender-breakdown time-series chart, and the year-ordered
//! table, with a file overlay for loading a local CSV.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table},
};

use crate::app::load;
use crate::app::state::AppState;
use crate::cli::{DataArgs, picker};
use crate::domain::{Breakdown, ParseMode};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{BreakdownSeries, SeriesChart, series_color};

/// Start the TUI.
pub fn run(args: DataArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Targets,
    Contents,
}

struct FileOverlay {
    files: Vec<PathBuf>,
    selected: usize,
}

struct App {
    args: DataArgs,
    state: AppState,
    /// Where the current dataset came from (URL or file path).
    origin: String,
    mode: ParseMode,
    rows_read: usize,
    row_errors: usize,
    focus: Focus,
    status: String,
    overlay: Option<FileOverlay>,
}

impl App {
    /// Build the initial app state.
    ///
    /// A failed initial fetch is not fatal: the UI starts with an empty
    /// dataset and a status message directing the user to open a CSV file.
    fn new(args: DataArgs) -> Self {
        let mut app = Self {
            args,
            state: AppState::new(),
            origin: "-".to_string(),
            mode: ParseMode::Strict,
            rows_read: 0,
            row_errors: 0,
            focus: Focus::Targets,
            status: String::new(),
            overlay: None,
        };

        if let Some(path) = app.args.file.clone() {
            app.load_file(&path);
        } else {
            app.fetch_default();
        }
        if app.args.pick {
            app.open_file_overlay();
        }
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.overlay.is_some() {
            self.handle_overlay_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    Focus::Targets => Focus::Contents,
                    Focus::Contents => Focus::Targets,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('o') => self.open_file_overlay(),
            KeyCode::Char('r') => self.fetch_default(),
            KeyCode::Char('e') => self.export_series(),
            _ => {}
        }
        false
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        let Some(overlay) = &mut self.overlay else {
            return;
        };

        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.overlay = None;
                self.status = "File open canceled.".to_string();
            }
            KeyCode::Up => {
                overlay.selected = overlay.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if overlay.selected + 1 < overlay.files.len() {
                    overlay.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(path) = overlay.files.get(overlay.selected).cloned() {
                    self.overlay = None;
                    self.load_file(&path);
                }
            }
            _ => {}
        }
    }

    /// Move the highlighted entry in the focused selector list.
    fn move_selection(&mut self, delta: i32) {
        let (options, current) = match self.focus {
            Focus::Targets => (self.state.targets(), self.state.selection().target.clone()),
            Focus::Contents => (self.state.contents(), self.state.selection().content.clone()),
        };
        if options.is_empty() {
            return;
        }

        let idx = current
            .and_then(|value| options.iter().position(|o| *o == value))
            .unwrap_or(0);
        let next = idx.saturating_add_signed(delta as isize).min(options.len() - 1);
        let choice = options[next].clone();

        match self.focus {
            Focus::Targets => self.state.select_target(choice),
            Focus::Contents => self.state.select_content(choice),
        }
    }

    fn open_file_overlay(&mut self) {
        let files = picker::discover_csv_files(Path::new("."));
        if files.is_empty() {
            self.status = "No .csv files found under the current directory.".to_string();
            return;
        }
        self.overlay = Some(FileOverlay { files, selected: 0 });
        self.status = "Choose a CSV file (Enter to load, Esc to cancel).".to_string();
    }

    /// Load a local CSV (lenient unless --mode overrides).
    ///
    /// On failure the previously loaded dataset stays active.
    fn load_file(&mut self, path: &Path) {
        let mode = self.args.mode.unwrap_or(ParseMode::Lenient);
        match load::load_file(path, mode) {
            Ok(loaded) => self.install_dataset(loaded),
            Err(err) => {
                self.status = format!("檔案解析錯誤: {err}");
            }
        }
    }

    /// Fetch the default dataset (strict unless --mode overrides).
    fn fetch_default(&mut self) {
        self.status = "Fetching default dataset...".to_string();
        let client = match &self.args.url {
            Some(url) => crate::data::DatasetClient::with_url(url.clone()),
            None => crate::data::DatasetClient::from_env(),
        };
        let mode = self.args.mode.unwrap_or(ParseMode::Strict);
        match load::fetch_default(&client, mode) {
            Ok(loaded) => self.install_dataset(loaded),
            Err(err) => {
                self.status = format!("無法加載初始數據，請開啟 CSV 檔案 (o)。({err})");
            }
        }
    }

    fn install_dataset(&mut self, loaded: load::LoadedDataset) {
        self.mode = loaded.mode;
        self.rows_read = loaded.ingest.rows_read;
        self.row_errors = loaded.ingest.row_errors.len();
        self.origin = loaded.origin;
        self.state.replace_dataset(loaded.ingest.records);
        self.status = format!(
            "Loaded {} record(s) from {}{}",
            self.state.records().len(),
            self.origin,
            if self.row_errors > 0 {
                format!(" ({} row(s) skipped/invalid)", self.row_errors)
            } else {
                String::new()
            }
        );
    }

    fn export_series(&mut self) {
        let points = self.state.chart_points();
        if points.is_empty() {
            self.status = "Nothing to export.".to_string();
            return;
        }
        let path = Path::new("time_series_export.csv");
        match crate::io::export::write_series_csv(path, &points) {
            Ok(()) => self.status = format!("Wrote series CSV: {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if self.overlay.is_some() {
            self.draw_file_overlay(frame, size);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sportviz", Style::default().fg(Color::Cyan)),
            Span::raw(" — 臺灣運動現況資料視覺化"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "source: {} | mode: {} | records: {}/{} | skipped: {}",
                self.origin,
                format!("{:?}", self.mode).to_lowercase(),
                self.state.records().len(),
                self.rows_read,
                self.row_errors,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
            .split(area);

        self.draw_selectors(frame, columns[0]);

        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(columns[1]);

        self.draw_chart(frame, panes[0]);
        self.draw_table(frame, panes[1]);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_option_list(
            frame,
            halves[0],
            "分析標的",
            &self.state.targets(),
            self.state.selection().target.as_deref(),
            self.focus == Focus::Targets,
        );
        self.draw_option_list(
            frame,
            halves[1],
            "分析內容",
            &self.state.contents(),
            self.state.selection().content.as_deref(),
            self.focus == Focus::Contents,
        );
    }

    fn draw_option_list(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        options: &[String],
        selected: Option<&str>,
        focused: bool,
    ) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let items: Vec<ListItem> = options
            .iter()
            .map(|o| ListItem::new(o.clone()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title.to_string())
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut list_state = ListState::default();
        list_state.select(selected.and_then(|value| options.iter().position(|o| o == value)));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .state
            .selection_title()
            .map(|t| format!("{t} - 隨時間變化趨勢"))
            .unwrap_or_else(|| "時間分析".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let points = self.state.chart_points();
        if points.is_empty() {
            let msg = Paragraph::new("沒有可用的數據。請開啟 CSV 檔案 (o)。")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        self.draw_legend(frame, chunks[0]);

        let (years, series, y_bounds) = chart_series(&points);
        let widget = SeriesChart {
            years: &years,
            series: &series,
            y_bounds,
        };
        frame.render_widget(widget, chunks[1]);
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        for (idx, breakdown) in Breakdown::CHARTED.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw("  "));
            }
            let (r, g, b) = series_color(*breakdown);
            spans.push(Span::styled(
                format!("● {}", breakdown.display_name()),
                Style::default().fg(Color::Rgb(r, g, b)),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .state
            .selection_title()
            .map(|t| format!("{t} - 歷年數據"))
            .unwrap_or_else(|| "歷年數據".to_string());

        let rows = self.state.table_rows();
        let table_rows: Vec<Row> = rows
            .iter()
            .map(|r| {
                Row::new(vec![
                    r.year.clone(),
                    r.item_label.clone(),
                    if r.value.is_finite() {
                        format!("{:.1}", r.value)
                    } else {
                        "-".to_string()
                    },
                    r.unit.clone(),
                ])
            })
            .collect();

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(8),
                Constraint::Min(16),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["年度", "統計項目說明", "數值", "單位"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(title).borders(Borders::ALL));

        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Tab pane  o open csv  r refetch  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_file_overlay(&self, frame: &mut ratatui::Frame<'_>, size: Rect) {
        let Some(overlay) = &self.overlay else {
            return;
        };

        let area = centered_rect(size, 70, 60);
        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = overlay
            .files
            .iter()
            .map(|p| ListItem::new(picker::pretty_path(p)))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title("開啟 CSV 檔案")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut list_state = ListState::default();
        list_state.select(Some(overlay.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

/// Build chart series for Plotters.
///
/// X values are year indices (labels are drawn from `years`); each breakdown
/// becomes line segments of consecutive finite values, so a year with a
/// missing or NAN value shows as a gap instead of an interpolated line.
fn chart_series(
    points: &[crate::analysis::TimeSeriesPoint],
) -> (Vec<String>, Vec<BreakdownSeries>, [f64; 2]) {
    let years: Vec<String> = points.iter().map(|p| p.year.clone()).collect();

    let mut series = Vec::with_capacity(Breakdown::CHARTED.len());
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for breakdown in Breakdown::CHARTED {
        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut run: Vec<(f64, f64)> = Vec::new();
        let mut markers: Vec<(f64, f64)> = Vec::new();

        for (idx, point) in points.iter().enumerate() {
            match point.value_for(breakdown).filter(|v| v.is_finite()) {
                Some(v) => {
                    y_min = y_min.min(v);
                    y_max = y_max.max(v);
                    run.push((idx as f64, v));
                    markers.push((idx as f64, v));
                }
                None => {
                    if run.len() > 1 {
                        segments.push(std::mem::take(&mut run));
                    } else {
                        run.clear();
                    }
                }
            }
        }
        if run.len() > 1 {
            segments.push(run);
        }

        series.push(BreakdownSeries {
            breakdown,
            segments,
            markers,
        });
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 100.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (years, series, [y_min - pad, y_max + pad])
}

fn centered_rect(size: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(size);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TimeSeriesPoint;

    fn point(year: &str, male: Option<f64>, overall: Option<f64>) -> TimeSeriesPoint {
        TimeSeriesPoint {
            year: year.to_string(),
            male,
            female: None,
            overall,
        }
    }

    #[test]
    fn chart_series_breaks_lines_at_gaps() {
        let points = vec![
            point("106", Some(58.0), Some(57.0)),
            point("107", None, Some(58.0)),
            point("108", Some(61.0), Some(59.0)),
            point("109", Some(62.0), Some(60.0)),
        ];

        let (years, series, y_bounds) = chart_series(&points);
        assert_eq!(years.len(), 4);

        let male = &series[0];
        assert_eq!(male.breakdown, Breakdown::Male);
        // 106 stands alone (no line), 108-109 form one segment.
        assert_eq!(male.segments.len(), 1);
        assert_eq!(male.segments[0], vec![(2.0, 61.0), (3.0, 62.0)]);
        assert_eq!(male.markers.len(), 3);

        let overall = &series[2];
        assert_eq!(overall.segments.len(), 1);
        assert_eq!(overall.segments[0].len(), 4);

        assert!(y_bounds[0] < 57.0 && y_bounds[1] > 62.0);
    }

    #[test]
    fn chart_series_treats_nan_as_gap() {
        let points = vec![
            point("107", Some(f64::NAN), None),
            point("108", Some(60.0), None),
        ];

        let (_, series, _) = chart_series(&points);
        assert!(series[0].segments.is_empty());
        assert_eq!(series[0].markers, vec![(1.0, 60.0)]);
    }

    #[test]
    fn chart_series_defaults_bounds_for_empty_or_flat_data() {
        let (_, _, y_bounds) = chart_series(&[]);
        assert!(y_bounds[0] <= 0.0 && y_bounds[1] >= 100.0);
    }
}
