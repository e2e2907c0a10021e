//! Plotters-powered time-series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Breakdown;

/// One gender series, pre-shaped for drawing.
///
/// X values are year indices into the shared label list. `segments` are runs
/// of consecutive finite values (a missing year breaks the line); `markers`
/// are every finite point, including isolated ones no segment covers.
pub struct BreakdownSeries {
    pub breakdown: Breakdown,
    pub segments: Vec<Vec<(f64, f64)>>,
    pub markers: Vec<(f64, f64)>,
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct SeriesChart<'a> {
    /// Year labels; index i labels x position i.
    pub years: &'a [String],
    pub series: &'a [BreakdownSeries],
    pub y_bounds: [f64; 2],
}

/// High-contrast terminal palette per breakdown.
pub fn series_color(breakdown: Breakdown) -> (u8, u8, u8) {
    match breakdown {
        Breakdown::Male => (0, 255, 255),    // cyan
        Breakdown::Female => (255, 0, 255),  // magenta
        Breakdown::Overall => (255, 255, 0), // yellow
        Breakdown::Other => (128, 128, 128),
    }
}

impl<'a> Widget for SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        // A single year still gets a visible x range around index 0.
        let (x0, x1) = if self.years.len() > 1 {
            (0.0, (self.years.len() - 1) as f64)
        } else {
            (-0.5, 0.5)
        };
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }

        let x_labels = self.years.len().clamp(3, 6);

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled to reduce visual
            // clutter in low-resolution terminal rendering; x tick labels are
            // the year text, looked up by index.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(x_labels)
                .y_labels(5)
                .x_label_formatter(&|v| {
                    let idx = v.round();
                    if (v - idx).abs() > 0.25 || idx < 0.0 {
                        return String::new();
                    }
                    self.years
                        .get(idx as usize)
                        .cloned()
                        .unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.series {
                let (r, g, b) = series_color(series.breakdown);
                let color = RGBColor(r, g, b);

                // Line runs; gaps between runs stay blank rather than being
                // interpolated across missing years.
                for segment in &series.segments {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                }

                // Per-year markers.
                //
                // We intentionally avoid `Circle` markers here. The underlying
                // `plotters-ratatui-backend` currently maps circle radii
                // incorrectly (pixel radius -> normalized canvas units),
                // producing huge circles. A colored `Pixel` gives a clean
                // "dot" that reliably reads in terminals.
                chart.draw_series(
                    series
                        .markers
                        .iter()
                        .map(|&(x, y)| Pixel::new((x, y), color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
