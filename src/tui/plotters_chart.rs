//! Plotters-powered regression chart widget for Ratatui.
//!
//! Rendered into the Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only chart description; series and bounds are computed by the caller.
pub struct SalaryFitChart<'a> {
    /// Sampled fitted polynomial.
    pub curve: &'a [(f64, f64)],
    /// Observed (company score, avg salary) pairs.
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: String,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SalaryFitChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            // Salary labels ("120k") need a wider left gutter than scores.
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Scores sit on a 0.5 grid: about one x tick per step.
            let grid = RGBColor(70, 70, 70);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(self.x_label)
                .y_desc(&self.y_label)
                .x_labels(((x1 - x0) * 2.0).ceil().clamp(2.0, 10.0) as usize)
                .y_labels(6)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&grid)
                .light_line_style(&grid)
                .draw()?;

            let curve_color = RGBColor(255, 0, 0);
            let points_color = RGBColor(0, 128, 255);

            // Points first so the curve stays visible where they overlap.
            // `Circle` radii are mis-scaled by the backend; use pixels.
            chart.draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), points_color)),
            )?;
            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
