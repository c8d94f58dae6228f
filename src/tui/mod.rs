//! Ratatui-based sales dashboard.
//!
//! The dashboard lists the CSV datasets in a data directory, groups the
//! selected dataset's value column by a text column, and renders one line
//! per category (raw totals or share of each category's total). The value
//! can be divided by a numeric adjustment column first. A side panel shows
//! the distribution of the normalized values, and `p` pops up a random
//! sample of the dataset's rows.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table,
    },
};

use crate::cli::DashboardArgs;
use crate::cli::picker::{dataset_name, discover_datasets};
use crate::domain::columns::DATE;
use crate::domain::{Column, FeatureTable};
use crate::error::AppError;
use crate::io::ingest::{IngestedTable, load_sales_table};
use crate::report::{
    CategorySeries, HistogramBin, group_sales, histogram, point_values, sample_rows, share_of_total,
};

mod plotters_chart;

use plotters_chart::{ChartSeries, SalesChart, legend_color};

/// Start the dashboard.
pub fn run(args: DashboardArgs) -> Result<(), AppError> {
    let mut app = App::new(args)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

/// Settings rows, in display order.
const FIELD_DATASET: usize = 0;
const FIELD_GROUP: usize = 1;
const FIELD_ADJUST: usize = 2;
const FIELD_VIEW: usize = 3;
const FIELD_COUNT: usize = 4;

/// Rows shown by the sample popup.
const SAMPLE_ROWS: usize = 5;
const HISTOGRAM_BINS: usize = 10;

struct App {
    data_dir: PathBuf,
    value: String,
    datasets: Vec<PathBuf>,
    dataset_idx: usize,
    ingest: Option<IngestedTable>,
    group_columns: Vec<String>,
    group_idx: usize,
    /// Requested adjustment column; only applied when the dataset has it.
    adjust: Option<String>,
    adjust_columns: Vec<String>,
    share: bool,
    selected_field: usize,
    series: Vec<CategorySeries>,
    histogram: Vec<HistogramBin>,
    /// Row indices shown in the sample popup, when open.
    sample: Option<Vec<usize>>,
    status: String,
}

impl App {
    fn new(args: DashboardArgs) -> Result<Self, AppError> {
        let datasets = discover_datasets(&args.data_dir);
        if datasets.is_empty() {
            return Err(AppError::new(
                2,
                format!(
                    "No .csv datasets found under '{}'. Use `calfeat dashboard --data-dir <dir>`.",
                    args.data_dir.display()
                ),
            ));
        }

        let mut app = Self {
            data_dir: args.data_dir,
            value: args.value,
            datasets,
            dataset_idx: 0,
            ingest: None,
            group_columns: Vec::new(),
            group_idx: 0,
            adjust: args.adjust,
            adjust_columns: Vec::new(),
            share: false,
            selected_field: FIELD_DATASET,
            series: Vec::new(),
            histogram: Vec::new(),
            sample: None,
            status: String::new(),
        };
        app.load_dataset();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc if self.sample.is_some() => self.sample = None,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('s') => self.toggle_share(),
            KeyCode::Char('p') => self.toggle_sample(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn toggle_share(&mut self) {
        self.share = !self.share;
        self.regroup();
        if self.ingest.is_some() {
            self.status = format!("view: {}", self.view_name());
        }
    }

    fn toggle_sample(&mut self) {
        if self.sample.take().is_some() {
            return;
        }
        if let Some(ingest) = &self.ingest {
            let rows = sample_rows(ingest.table.len(), SAMPLE_ROWS, &mut rand::thread_rng());
            self.sample = Some(rows);
        }
    }

    fn adjust_field(&mut self, delta: isize) {
        match self.selected_field {
            FIELD_DATASET => {
                self.dataset_idx = step(self.dataset_idx, self.datasets.len(), delta);
                self.load_dataset();
            }
            FIELD_GROUP => {
                if self.group_columns.is_empty() {
                    return;
                }
                self.group_idx = step(self.group_idx, self.group_columns.len(), delta);
                self.regroup();
                self.status = format!("group by: {}", self.group_columns[self.group_idx]);
            }
            FIELD_ADJUST => {
                // Option 0 is "no adjustment".
                let current = self
                    .active_adjust()
                    .and_then(|a| self.adjust_columns.iter().position(|c| c == a))
                    .map_or(0, |i| i + 1);
                let next = step(current, self.adjust_columns.len() + 1, delta);
                self.adjust = next.checked_sub(1).map(|i| self.adjust_columns[i].clone());
                self.regroup();
                self.status = format!("adjust: {}", self.adjust_name());
            }
            FIELD_VIEW => self.toggle_share(),
            _ => {}
        }
    }

    /// Rediscover datasets and reload the current one (by name when possible).
    fn reload(&mut self) {
        let current = self.datasets.get(self.dataset_idx).cloned();
        let datasets = discover_datasets(&self.data_dir);
        if datasets.is_empty() {
            self.status = format!("No datasets under '{}'.", self.data_dir.display());
            return;
        }
        self.dataset_idx = current
            .and_then(|p| datasets.iter().position(|d| *d == p))
            .unwrap_or(0);
        self.datasets = datasets;
        self.load_dataset();
    }

    fn load_dataset(&mut self) {
        let Some(path) = self.datasets.get(self.dataset_idx) else {
            return;
        };

        match load_sales_table(path) {
            Ok(ingest) => {
                let previous = self.group_columns.get(self.group_idx).cloned();
                self.group_columns = group_columns(&ingest.table);
                self.group_idx = previous
                    .and_then(|c| self.group_columns.iter().position(|g| *g == c))
                    .unwrap_or(0);
                self.adjust_columns = adjust_columns(&ingest.table, &self.value);
                self.sample = None;
                self.status = format!(
                    "Loaded {} ({} rows, {} skipped)",
                    dataset_name(path),
                    ingest.rows_used,
                    ingest.row_errors.len()
                );
                self.ingest = Some(ingest);
                self.regroup();
            }
            Err(err) => {
                self.ingest = None;
                self.group_columns.clear();
                self.adjust_columns.clear();
                self.series.clear();
                self.histogram.clear();
                self.sample = None;
                self.status = err.to_string();
            }
        }
    }

    fn regroup(&mut self) {
        let (Some(ingest), Some(column)) = (&self.ingest, self.group_columns.get(self.group_idx)) else {
            self.series.clear();
            self.histogram.clear();
            return;
        };

        match group_sales(&ingest.table, column, &self.value, self.active_adjust()) {
            Ok(series) => {
                let shares = share_of_total(&series);
                self.histogram = histogram(&point_values(&shares), HISTOGRAM_BINS);
                self.series = if self.share { shares } else { series };
            }
            Err(err) => {
                self.series.clear();
                self.histogram.clear();
                self.status = err.to_string();
            }
        }
    }

    /// The requested adjustment column, if the loaded dataset has it.
    fn active_adjust(&self) -> Option<&str> {
        self.adjust
            .as_deref()
            .filter(|a| self.adjust_columns.iter().any(|c| c == a))
    }

    fn adjust_name(&self) -> String {
        match (self.adjust.as_deref(), self.active_adjust()) {
            (None, _) => "none".to_string(),
            (Some(a), Some(_)) => a.to_string(),
            (Some(a), None) => format!("{a} (not in dataset)"),
        }
    }

    fn view_name(&self) -> &'static str {
        if self.share { "share of total" } else { "raw" }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
        if let (Some(rows), Some(ingest)) = (&self.sample, &self.ingest) {
            draw_sample(frame, size, &ingest.table, rows);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("calfeat", Style::default().fg(Color::Cyan)),
            Span::raw(" - sales dashboard"),
        ]));

        let dataset = self
            .datasets
            .get(self.dataset_idx)
            .map(|p| dataset_name(p))
            .unwrap_or_else(|| "-".to_string());
        let rows = self.ingest.as_ref().map(|i| i.rows_used).unwrap_or(0);

        lines.push(Line::from(Span::styled(
            format!(
                "dataset: {dataset} | rows: {rows} | value: {} | adjust: {} | group: {} | view: {}",
                self.value,
                self.adjust_name(),
                self.group_columns
                    .get(self.group_idx)
                    .map(String::as_str)
                    .unwrap_or("-"),
                self.view_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FIELD_COUNT as u16 + 2)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(chunks[0]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.draw_chart(frame, top[0]);
        self.draw_histogram(frame, top[1]);
        self.draw_settings(frame, bottom[0]);
        self.draw_legend(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((series, x_bounds, y_bounds)) = chart_series(&self.series) else {
            let msg = Paragraph::new("No data to plot.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let adjusted;
        let y_label = match (self.share, self.active_adjust()) {
            (true, _) => "share",
            (false, Some(adjust)) => {
                adjusted = format!("{}/{adjust}", self.value);
                adjusted.as_str()
            }
            (false, None) => self.value.as_str(),
        };
        let fmt_y: fn(f64) -> String = if self.share { fmt_axis_share } else { fmt_axis_value };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SalesChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_label: DATE,
            y_label,
            fmt_x: fmt_axis_date,
            fmt_y,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, fmt_y, y_label);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let dataset = self
            .datasets
            .get(self.dataset_idx)
            .map(|p| dataset_name(p))
            .unwrap_or_else(|| "-".to_string());
        let group = self
            .group_columns
            .get(self.group_idx)
            .map(String::as_str)
            .unwrap_or("-");

        let items = vec![
            ListItem::new(format!(
                "Dataset: {dataset} ({}/{})",
                self.dataset_idx + 1,
                self.datasets.len()
            )),
            ListItem::new(format!("Group by: {group}")),
            ListItem::new(format!("Adjust: {}", self.adjust_name())),
            ListItem::new(format!("View: {}", self.view_name())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Distribution of the values normalized by their category total.
    fn draw_histogram(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Distribution (share)").borders(Borders::ALL);
        if self.histogram.is_empty() {
            frame.render_widget(Paragraph::new("No data.").block(block), area);
            return;
        }

        let bars: Vec<Bar> = self
            .histogram
            .iter()
            .map(|bin| {
                Bar::default()
                    .value(bin.count as u64)
                    .label(Line::from(fmt_axis_share(bin.lo)))
                    .style(Style::default().fg(Color::Cyan))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .series
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                ListItem::new(Line::from(vec![
                    Span::styled("── ", Style::default().fg(legend_color(idx))),
                    Span::raw(format!("{}  total={:.2}", s.category, s.total())),
                ]))
            })
            .collect();

        let list = List::new(items).block(Block::default().title("Categories").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  s share  p sample  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Text columns a dataset can be grouped by.
fn group_columns(table: &FeatureTable) -> Vec<String> {
    table
        .columns()
        .filter(|(name, column)| *name != DATE && matches!(column, Column::Text(_)))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Numeric columns the value can be divided by.
fn adjust_columns(table: &FeatureTable, value: &str) -> Vec<String> {
    table
        .columns()
        .filter(|(name, column)| *name != value && matches!(column, Column::Int(_) | Column::Float(_)))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Formatted cells of `rows`, one inner vector per row, in column order.
fn sample_cells(table: &FeatureTable, rows: &[usize]) -> Vec<Vec<String>> {
    rows.iter()
        .filter(|&&row| row < table.len())
        .map(|&row| table.columns().map(|(_, column)| column.format_cell(row)).collect())
        .collect()
}

fn draw_sample(frame: &mut ratatui::Frame<'_>, area: Rect, table: &FeatureTable, rows: &[usize]) {
    let popup = centered_rect(area, 90, SAMPLE_ROWS as u16 + 4);
    frame.render_widget(Clear, popup);

    let header = Row::new(table.column_names().map(|n| Cell::from(n.to_string())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = sample_cells(table, rows).into_iter().map(Row::new);
    let widths: Vec<Constraint> = table
        .column_names()
        .map(|n| Constraint::Length(n.len().max(10) as u16))
        .collect();

    let widget = Table::new(body, widths).header(header).block(
        Block::default()
            .title(format!("Sample ({} rows)  p/Esc close", rows.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, popup);
}

/// `percent_x` of the width and `height` rows, centered in `area`.
fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Wrapping step through `len` options.
fn step(idx: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (idx as isize + delta).rem_euclid(len as isize) as usize
}

/// Build chart series for Plotters. `None` when there is nothing to draw.
fn chart_series(series: &[CategorySeries]) -> Option<(Vec<ChartSeries>, [f64; 2], [f64; 2])> {
    let out: Vec<ChartSeries> = series
        .iter()
        .map(|s| ChartSeries {
            points: s
                .points
                .iter()
                .map(|&(d, v)| (f64::from(d.num_days_from_ce()), v))
                .collect(),
        })
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in out.iter().flat_map(|s| &s.points) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        return None;
    }
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some((out, [x_min, x_max], [y_min - pad, y_max + pad]))
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn fmt_axis_value(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_share(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

#[allow(clippy::too_many_arguments)]
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    fmt_y: fn(f64) -> String,
    y_label: &str,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_y(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(DATE)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(0, 3, -1), 2);
        assert_eq!(step(2, 3, 1), 0);
        assert_eq!(step(1, 3, 1), 2);
        assert_eq!(step(0, 0, 1), 0);
    }

    #[test]
    fn group_columns_are_text_only() {
        let mut t = FeatureTable::new();
        t.insert("date", Column::Date(vec![d(2020, 1, 1)])).unwrap();
        t.insert("country", Column::Text(vec!["Spain".into()])).unwrap();
        t.insert("num_sold", Column::Int(vec![3])).unwrap();
        t.insert("product", Column::Text(vec!["Book".into()])).unwrap();
        assert_eq!(group_columns(&t), vec!["country".to_string(), "product".to_string()]);
    }

    #[test]
    fn chart_series_bounds_cover_all_points() {
        let series = vec![
            CategorySeries {
                category: "Spain".into(),
                points: vec![(d(2020, 1, 1), 10.0), (d(2020, 1, 3), 30.0)],
            },
            CategorySeries {
                category: "Japan".into(),
                points: vec![(d(2020, 1, 2), 20.0)],
            },
        ];
        let (out, x, y) = chart_series(&series).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].points.len(), 1);
        assert_eq!(x[1] - x[0], 2.0);
        assert!(y[0] < 10.0 && y[1] > 30.0);
        assert_eq!(fmt_axis_date(x[0]), "2020-01");
    }

    #[test]
    fn chart_series_empty_is_none() {
        assert!(chart_series(&[]).is_none());
    }
    fn dashboard(adjust: Option<&str>) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("train.csv"),
            "date,country,num_sold,gdp\n\
             2022-01-01,Spain,10,2\n\
             2022-01-01,Japan,30,3\n\
             2022-01-02,Spain,30,5\n\
             2022-01-02,Japan,60,4\n\
             2022-01-03,Spain,20,4\n\
             2022-01-03,Japan,10,5\n",
        )
        .unwrap();
        let app = App::new(DashboardArgs {
            data_dir: dir.path().to_path_buf(),
            value: "num_sold".to_string(),
            adjust: adjust.map(str::to_string),
        })
        .unwrap();
        (dir, app)
    }

    fn spain_values(app: &App) -> Vec<f64> {
        app.series[0].points.iter().map(|&(_, v)| v).collect()
    }

    #[test]
    fn every_settings_row_is_selectable() {
        let (_dir, mut app) = dashboard(None);
        for expected in [FIELD_GROUP, FIELD_ADJUST, FIELD_VIEW, FIELD_VIEW] {
            app.handle_key(KeyCode::Down);
            assert_eq!(app.selected_field, expected);
        }
        for _ in 0..FIELD_COUNT {
            app.handle_key(KeyCode::Up);
        }
        assert_eq!(app.selected_field, FIELD_DATASET);
    }

    #[test]
    fn view_row_toggles_share_with_left_and_right() {
        let (_dir, mut app) = dashboard(None);
        app.selected_field = FIELD_VIEW;

        app.handle_key(KeyCode::Right);
        assert!(app.share);
        assert!((app.series[0].total() - 1.0).abs() < 1e-12);
        assert_eq!(app.view_name(), "share of total");

        app.handle_key(KeyCode::Left);
        assert!(!app.share);
        assert_eq!(spain_values(&app), vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn adjust_row_cycles_through_numeric_columns() {
        let (_dir, mut app) = dashboard(None);
        assert_eq!(app.adjust_columns, vec!["gdp".to_string()]);
        app.selected_field = FIELD_ADJUST;

        app.handle_key(KeyCode::Right);
        assert_eq!(app.active_adjust(), Some("gdp"));
        assert_eq!(spain_values(&app), vec![5.0, 6.0, 5.0]);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.active_adjust(), None);
        assert_eq!(app.adjust_name(), "none");
        assert_eq!(spain_values(&app), vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn adjust_argument_applies_on_load() {
        let (_dir, app) = dashboard(Some("gdp"));
        assert_eq!(spain_values(&app), vec![5.0, 6.0, 5.0]);

        let (_dir, app) = dashboard(Some("population"));
        assert_eq!(app.active_adjust(), None);
        assert_eq!(app.adjust_name(), "population (not in dataset)");
        assert_eq!(spain_values(&app), vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn histogram_counts_normalized_points() {
        let (_dir, app) = dashboard(None);
        assert_eq!(app.histogram.len(), HISTOGRAM_BINS);
        let counted: usize = app.histogram.iter().map(|b| b.count).sum();
        assert_eq!(counted, 6);
        // Shares run from 10/100 (Japan, day 3) to 60/100 (Japan, day 2).
        assert!((app.histogram[0].lo - 0.1).abs() < 1e-12);
        assert!((app.histogram[HISTOGRAM_BINS - 1].hi - 0.6).abs() < 1e-12);
    }

    #[test]
    fn sample_popup_toggles_and_closes_before_quitting() {
        let (_dir, mut app) = dashboard(None);

        assert!(!app.handle_key(KeyCode::Char('p')));
        let rows = app.sample.clone().unwrap();
        assert_eq!(rows.len(), SAMPLE_ROWS);
        assert!(rows.iter().all(|&r| r < 6));

        assert!(!app.handle_key(KeyCode::Esc));
        assert!(app.sample.is_none());
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn sample_cells_follow_column_order() {
        let (_dir, app) = dashboard(None);
        let table = &app.ingest.as_ref().unwrap().table;
        assert_eq!(
            sample_cells(table, &[1, 4, 99]),
            vec![
                vec!["2022-01-01".to_string(), "Japan".into(), "30".into(), "3".into()],
                vec!["2022-01-03".to_string(), "Spain".into(), "20".into(), "4".into()],
            ]
        );
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 6);
        let r = centered_rect(area, 90, 9);
        assert_eq!(r, Rect::new(5, 0, 90, 6));
    }
}
