//! Multi-line sales chart, drawn with Plotters into the Ratatui buffer
//! through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

/// High-contrast line colors, cycled per category.
const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (200, 120, 255),
    (255, 255, 255),
];

/// One line on the chart. `x` is a day number (days since CE), `y` the value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<(f64, f64)>,
}

/// Plotters color of the `idx`-th series.
pub fn series_color(idx: usize) -> RGBColor {
    let (r, g, b) = PALETTE[idx % PALETTE.len()];
    RGBColor(r, g, b)
}

/// Same color for Ratatui text (legend entries).
pub fn legend_color(idx: usize) -> Color {
    let (r, g, b) = PALETTE[idx % PALETTE.len()];
    Color::Rgb(r, g, b)
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct SalesChart<'a> {
    pub series: &'a [ChartSeries],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SalesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out axes in a tiny area.
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            buf.set_string(
                area.x,
                area.y,
                "Enlarge the terminal to see the chart.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let finite = [x0, x1, y0, y1].iter().all(|v| v.is_finite());
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (idx, series) in self.series.iter().enumerate() {
                let color = series_color(idx);
                chart.draw_series(LineSeries::new(series.points.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
