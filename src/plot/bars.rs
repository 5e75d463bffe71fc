//! Text bar charts for the salary-mean views.
//!
//! Bars always start at zero. Horizontal charts suit long labels (job titles,
//! locations); the vertical chart suits short numeric keys (company scores).

use crate::report::{fmt_amount, truncate};

const BAR: char = '█';
const LABEL_WIDTH: usize = 24;

/// One bar per `(label, value)`, top to bottom in input order.
pub fn render_hbar_chart(title: &str, bars: &[(String, f64)], width: usize) -> String {
    let mut out = format!("{title}\n");
    if bars.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = bars
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_WIDTH);
    let bar_width = width.max(10);
    let max = max_value(bars);

    for (label, value) in bars {
        let len = scaled(*value, max, bar_width);
        out.push_str(&format!(
            "{:<label_width$} |{} {}",
            truncate(label, label_width),
            BAR.to_string().repeat(len),
            fmt_amount(*value),
        ));
        out.push('\n');
    }
    out
}

/// One column per `(label, value)`, left to right in input order.
pub fn render_vbar_chart(title: &str, bars: &[(String, f64)], height: usize) -> String {
    let mut out = format!("{title}\n");
    if bars.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let height = height.max(3);
    let col_width = bars
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(1)
        .max(3);
    let max = max_value(bars);
    let heights: Vec<usize> = bars.iter().map(|(_, v)| scaled(*v, max, height)).collect();

    out.push_str(&format!("max {}\n", fmt_amount(max)));
    for level in (1..=height).rev() {
        let mut line = String::new();
        for &h in &heights {
            let cell = if h >= level { BAR } else { ' ' };
            line.push_str(&format!("{:^col_width$} ", cell.to_string()));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&"-".repeat(bars.len() * (col_width + 1)));
    out.push('\n');
    let labels: String = bars
        .iter()
        .map(|(l, _)| format!("{:^col_width$} ", truncate(l, col_width)))
        .collect();
    out.push_str(labels.trim_end());
    out.push('\n');
    out
}

fn max_value(bars: &[(String, f64)]) -> f64 {
    bars.iter().map(|(_, v)| *v).fold(0.0, f64::max)
}

fn scaled(value: f64, max: f64, cells: usize) -> usize {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / max) * cells as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hbar_golden_snapshot() {
        let bars = vec![("A".to_string(), 105_000.0), ("Bee".to_string(), 52_500.0)];
        let txt = render_hbar_chart("Average Salary by Job Title", &bars, 10);
        let expected = concat!(
            "Average Salary by Job Title\n",
            "A   |██████████ 105,000.00\n",
            "Bee |█████ 52,500.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn vbar_golden_snapshot() {
        let bars = vec![("4.5".to_string(), 100.0), ("3".to_string(), 50.0)];
        let txt = render_vbar_chart("Average Salary by Company Score", &bars, 4);
        let expected = concat!(
            "Average Salary by Company Score\n",
            "max 100.00\n",
            " █\n",
            " █\n",
            " █   █\n",
            " █   █\n",
            "--------\n",
            "4.5  3\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_chart_says_so() {
        assert!(render_hbar_chart("t", &[], 10).ends_with("(no data)\n"));
        assert!(render_vbar_chart("t", &[], 10).ends_with("(no data)\n"));
    }
}
