//! Ratatui-based terminal UI.
//!
//! One screen per aggregate view plus the regression. The polynomial degree is
//! adjusted live, and another survey file can be opened by path; both go
//! through the same pipeline (and load cache) as the printed report. Errors
//! end up in the status line, never in a crash.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

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
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Tabs},
};

use crate::app::pipeline::{RunOutput, run_path};
use crate::domain::{PolyFit, ReportConfig};
use crate::error::AppError;
use crate::io::LoadCache;
use crate::plot::{render_pie_chart, sample_curve, x_range};
use crate::report::{
    TITLE_BY_JOB, TITLE_BY_LOCATION, TITLE_BY_SCORE, TITLE_JOB_COUNTS, TITLE_LOCATION_COUNTS, TITLE_REGRESSION,
    count_slices, fmt_r2, format_count_view, format_fit_summary, format_mean_view, mean_bars, truncate,
};

mod plotters_chart;

use plotters_chart::SalaryFitChart;

/// Start the TUI.
pub fn run(config: ReportConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, LoadCache::global());
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

/// Screens, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    ByJob,
    ByScore,
    ByLocation,
    JobCounts,
    LocationCounts,
    Regression,
}

impl View {
    const ALL: [View; 6] = [
        View::ByJob,
        View::ByScore,
        View::ByLocation,
        View::JobCounts,
        View::LocationCounts,
        View::Regression,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn tab_label(self) -> &'static str {
        match self {
            View::ByJob => "1 Job",
            View::ByScore => "2 Score",
            View::ByLocation => "3 Location",
            View::JobCounts => "4 Job freq",
            View::LocationCounts => "5 Location freq",
            View::Regression => "6 Regression",
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::ByJob => TITLE_BY_JOB,
            View::ByScore => TITLE_BY_SCORE,
            View::ByLocation => TITLE_BY_LOCATION,
            View::JobCounts => TITLE_JOB_COUNTS,
            View::LocationCounts => TITLE_LOCATION_COUNTS,
            View::Regression => TITLE_REGRESSION,
        }
    }
}

struct App {
    config: ReportConfig,
    cache: &'static LoadCache,
    view: View,
    path_input: String,
    editing_path: bool,
    scroll: u16,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: ReportConfig, cache: &'static LoadCache) -> Self {
        let mut app = Self {
            config,
            cache,
            view: View::ByJob,
            path_input: String::new(),
            editing_path: false,
            scroll: 0,
            status: "Press o to open a survey CSV.".to_string(),
            run: None,
        };
        if let Some(path) = app.config.csv_path.clone() {
            app.load(path);
        }
        app
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
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
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
        if self.editing_path {
            self.handle_path_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.set_view(self.view.next()),
            KeyCode::BackTab => self.set_view(self.view.prev()),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.set_view(View::ALL[idx]);
            }
            KeyCode::Left | KeyCode::Char('-') => self.adjust_degree(-1),
            KeyCode::Right | KeyCode::Char('+') => self.adjust_degree(1),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Char('o') => {
                self.editing_path = true;
                self.path_input = self
                    .config
                    .csv_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.status = "Enter CSV path. Enter to load, Esc to cancel.".to_string();
            }
            KeyCode::Char('r') => match self.config.csv_path.clone() {
                Some(path) => self.load(path),
                None => self.status = "No file loaded yet (press o).".to_string(),
            },
            _ => {}
        }

        false
    }

    fn handle_path_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_path = false;
                self.status = "Open canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_path = false;
                let trimmed = self.path_input.trim();
                if trimmed.is_empty() {
                    self.status = "No path entered.".to_string();
                } else {
                    self.load(PathBuf::from(trimmed));
                }
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => self.path_input.push(c),
            _ => {}
        }
    }

    fn set_view(&mut self, view: View) {
        self.view = view;
        self.scroll = 0;
    }

    fn adjust_degree(&mut self, delta: i32) {
        let next = if delta >= 0 {
            self.config.degree.increment()
        } else {
            self.config.degree.decrement()
        };
        if next == self.config.degree {
            self.status = format!("degree stays at {} (range 1-5)", next);
            return;
        }

        self.config.degree = next;
        if let Some(run) = &mut self.run {
            run.refit(next);
            self.status = match &run.fit {
                Ok(fit) => format!("degree: {next} | MSE: {:.2} | R2: {}", fit.mse, fmt_r2(fit.r2)),
                Err(e) => format!("degree: {next} | {e}"),
            };
        } else {
            self.status = format!("degree: {next}");
        }
    }

    /// Load `path` and replace the session table. On failure the previous
    /// table stays on screen.
    fn load(&mut self, path: PathBuf) {
        match run_path(self.cache, &path, &self.config) {
            Ok(run) => {
                self.status = match &run.fit {
                    Ok(_) => format!("Loaded {} ({} rows).", run.table.source, run.table.len()),
                    Err(e) => format!("Loaded {} but regression unavailable: {e}", run.table.source),
                };
                self.run = Some(run);
                self.config.csv_path = Some(path);
                self.scroll = 0;
            }
            Err(e) => {
                log::warn!("failed to load {}: {e}", path.display());
                self.status = if self.run.is_some() {
                    format!("{e} (keeping previous file)")
                } else {
                    e.to_string()
                };
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("salary", Style::default().fg(Color::Cyan)),
            Span::raw(" - software company salary analysis"),
        ]));

        let summary = match &self.run {
            Some(run) => {
                let fit = match &run.fit {
                    Ok(fit) => format!("MSE: {:.2} | R2: {}", fit.mse, fmt_r2(fit.r2)),
                    Err(_) => "regression unavailable".to_string(),
                };
                format!(
                    "file: {} | rows: {} | with salary: {} | degree: {} | {fit}",
                    run.table.source,
                    run.table.len(),
                    run.table.rows_with_salary(),
                    self.config.degree,
                )
            }
            None => format!("file: - | degree: {}", self.config.degree),
        };
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs = Tabs::new(View::ALL.iter().map(|v| v.tab_label()))
            .select(self.view.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data loaded. Press o and enter the path of a survey CSV.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        if self.view == View::Regression {
            self.draw_regression(frame, inner, run);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(inner);

        let listing = self.listing_text(run);
        frame.render_widget(Paragraph::new(listing).scroll((self.scroll, 0)), chunks[0]);

        match self.view {
            View::ByJob | View::ByLocation => self.draw_hbars(frame, chunks[1], run),
            View::ByScore => self.draw_vbars(frame, chunks[1], run),
            View::JobCounts | View::LocationCounts => self.draw_pie(frame, chunks[1], run),
            View::Regression => {}
        }
    }

    fn listing_text(&self, run: &RunOutput) -> String {
        let views = &run.views;
        let top = self.config.top_n;
        match self.view {
            View::ByJob => format_mean_view(TITLE_BY_JOB, "job title", &views.by_job, top),
            View::ByScore => format_mean_view(TITLE_BY_SCORE, "company score", &views.by_score, top),
            View::ByLocation => format_mean_view(TITLE_BY_LOCATION, "location", &views.by_location, top),
            View::JobCounts => format_count_view(TITLE_JOB_COUNTS, "job title", &views.job_counts, top),
            View::LocationCounts => {
                format_count_view(TITLE_LOCATION_COUNTS, "location", &views.location_counts, top)
            }
            View::Regression => String::new(),
        }
    }

    fn mean_series(&self, run: &RunOutput) -> Vec<(String, f64)> {
        let views = &run.views;
        let top = self.config.top_n;
        match self.view {
            View::ByJob => mean_bars(&views.by_job, top),
            View::ByScore => mean_bars(&views.by_score, top),
            View::ByLocation => mean_bars(&views.by_location, top),
            _ => Vec::new(),
        }
    }

    fn draw_hbars(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let series = self.mean_series(run);
        let bars: Vec<Bar> = series
            .iter()
            .map(|(label, value)| salary_bar(truncate(label, 20), *value))
            .collect();
        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_vbars(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let series = self.mean_series(run);
        let bars: Vec<Bar> = series
            .iter()
            .map(|(label, value)| salary_bar(label.clone(), *value))
            .collect();
        let chart = BarChart::default()
            .bar_width(7)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_pie(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let (title, view) = match self.view {
            View::JobCounts => (TITLE_JOB_COUNTS, &run.views.job_counts),
            _ => (TITLE_LOCATION_COUNTS, &run.views.location_counts),
        };
        let slices = count_slices(view, self.config.top_n);
        let radius = pie_radius(area, slices.len());
        let text = render_pie_chart(title, &slices, radius);
        frame.render_widget(Paragraph::new(text).scroll((self.scroll, 0)), area);
    }

    fn draw_regression(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let fit = match &run.fit {
            Ok(fit) => fit,
            Err(e) => {
                let msg = Paragraph::new(format!("Regression unavailable: {e}"))
                    .style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        let heading = Paragraph::new(format!(
            "Polynomial Regression (Degree={}) | MSE: {:.2}, R2: {}",
            fit.degree,
            fit.mse,
            fmt_r2(fit.r2)
        ))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
        let chart_area = Rect {
            y: chunks[0].y + 1,
            height: chunks[0].height.saturating_sub(1),
            ..chunks[0]
        };
        frame.render_widget(heading, Rect { height: 1, ..chunks[0] });

        let (curve, points, x_bounds, y_bounds) = chart_series(fit);
        let (chart_rect, insets) = chart_layout(chart_area);
        let widget = SalaryFitChart {
            curve: &curve,
            points: &points,
            x_bounds,
            y_bounds,
            x_label: "company score",
            y_label: "avg salary".to_string(),
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, chart_area, chart_rect, insets, x_bounds, y_bounds);
        }

        frame.render_widget(
            Paragraph::new(format_fit_summary(fit)).block(Block::default().borders(Borders::TOP)),
            chunks[1],
        );
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.editing_path {
            let line = Line::from(vec![
                Span::styled("open: ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(self.path_input.as_str()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]);
            let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        }

        let help = "Tab/1-6 view  ←/→ degree  ↑/↓ scroll  o open  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn salary_bar(label: String, value: f64) -> Bar<'static> {
    Bar::default()
        .label(Line::from(label))
        .value(value.max(0.0).round() as u64)
        .text_value(format!("{value:.0}"))
}

/// Largest pie that fits `area` with a legend of `legend_rows` lines below it.
fn pie_radius(area: Rect, legend_rows: usize) -> usize {
    let height = usize::from(area.height).saturating_sub(legend_rows + 2);
    let by_height = height.saturating_sub(1) / 2;
    // Each row of a radius-r pie is 2 * (2r + 1) columns wide.
    let by_width = (usize::from(area.width) / 2).saturating_sub(1) / 2;
    by_height.min(by_width).clamp(2, 12)
}

/// Build chart series for Plotters.
fn chart_series(fit: &PolyFit) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let (x0, x1) = x_range(&fit.x).unwrap_or((0.0, 5.0));
    let curve = sample_curve(fit, x0, x1, 200);
    let points: Vec<(f64, f64)> = fit.x.iter().copied().zip(fit.y.iter().copied()).collect();

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points.iter().chain(&curve) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        let mid = if y_min.is_finite() { y_min } else { 0.0 };
        y_min = mid - 1.0;
        y_max = mid + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let x_pad = ((x1 - x0) * 0.02).max(1e-12);
    (curve, points, [x0 - x_pad, x1 + x_pad], [y_min - pad, y_max + pad])
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.1}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{:.0}k", v / 1000.0)
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
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
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

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_x(x_val);
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
        let label = fmt_axis_y(y_val);
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

    let x_label = Paragraph::new("company score")
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
}
