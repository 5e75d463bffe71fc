//! Text pie chart for the frequency views.
//!
//! Slices start at 12 o'clock and run counter-clockwise, in input order.
//! Terminal cells are roughly twice as tall as wide, so each row covers two
//! columns per unit of radius.

use crate::report::truncate;

/// Fill glyphs, cycled when there are more slices than glyphs.
const GLYPHS: [char; 10] = ['#', 'o', '+', '*', '=', '%', '@', 'x', '~', ':'];

/// Render a pie of `(label, count)` slices plus a legend with percentages.
pub fn render_pie_chart(title: &str, slices: &[(String, usize)], radius: usize) -> String {
    let mut out = format!("{title}\n");
    let total: usize = slices.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        out.push_str("(no data)\n");
        return out;
    }

    // Cumulative fraction at the end of each slice.
    let mut bounds = Vec::with_capacity(slices.len());
    let mut acc = 0usize;
    for (_, count) in slices {
        acc += count;
        bounds.push(acc as f64 / total as f64);
    }

    let radius = radius.max(2) as f64;
    let rows = (2.0 * radius) as usize + 1;
    let cols = 2 * rows;
    let cy = radius;

    for row in 0..rows {
        let mut line = String::with_capacity(cols);
        for col in 0..cols {
            let dx = (col as f64 - (cols as f64 - 1.0) / 2.0) / 2.0;
            let dy = cy - row as f64;
            if dx * dx + dy * dy > (radius + 0.25) * (radius + 0.25) {
                line.push(' ');
                continue;
            }
            let idx = slice_at(dx, dy, &bounds);
            line.push(GLYPHS[idx % GLYPHS.len()]);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format_legend(slices, total));
    out
}

/// Index of the slice covering direction `(dx, dy)` (y pointing up).
fn slice_at(dx: f64, dy: f64, bounds: &[f64]) -> usize {
    // Angle measured counter-clockwise from 12 o'clock, in [0, 1).
    let angle = dy.atan2(dx).to_degrees();
    let turn = ((angle - 90.0).rem_euclid(360.0)) / 360.0;
    bounds
        .iter()
        .position(|&b| turn < b)
        .unwrap_or(bounds.len().saturating_sub(1))
}

fn format_legend(slices: &[(String, usize)], total: usize) -> String {
    let mut out = String::new();
    for (i, (label, count)) in slices.iter().enumerate() {
        let pct = 100.0 * *count as f64 / total as f64;
        out.push_str(&format!(
            "{} {:<24} {:>5.1}% ({count})\n",
            GLYPHS[i % GLYPHS.len()],
            truncate(label, 24),
            pct,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices(items: &[(&str, usize)]) -> Vec<(String, usize)> {
        items.iter().map(|(l, c)| (l.to_string(), *c)).collect()
    }

    #[test]
    fn legend_shows_one_decimal_percentages() {
        let txt = render_pie_chart("Job Title Frequency", &slices(&[("A", 2), ("B", 1)]), 3);
        assert!(txt.starts_with("Job Title Frequency\n"));
        let pad = " ".repeat(25);
        assert!(txt.contains(&format!("# A{pad}66.7% (2)\n")), "{txt}");
        assert!(txt.contains(&format!("o B{pad}33.3% (1)\n")), "{txt}");
    }

    #[test]
    fn first_slice_starts_counter_clockwise_from_the_top() {
        // Two equal halves: the first covers the left side, the second the right.
        let txt = render_pie_chart("t", &slices(&[("L", 1), ("R", 1)]), 4);
        let middle = txt.lines().nth(1 + 4).unwrap();
        assert_eq!(middle.chars().next(), Some('#'));
        assert_eq!(middle.chars().last(), Some('o'));
    }

    #[test]
    fn single_slice_fills_the_disc() {
        let txt = render_pie_chart("t", &slices(&[("only", 5)]), 3);
        let disc: String = txt.lines().skip(1).take(7).collect();
        assert!(disc.chars().all(|c| c == '#' || c == ' '));
        assert!(disc.contains('#'));
    }

    #[test]
    fn slice_lookup_follows_cumulative_bounds() {
        let bounds = [0.25, 0.5, 1.0];
        // Straight left is a quarter turn counter-clockwise from the top.
        assert_eq!(slice_at(-1.0, 0.0, &bounds), 1);
        // Just counter-clockwise of the top.
        assert_eq!(slice_at(-0.01, 1.0, &bounds), 0);
        // Straight right is three quarters of the way round.
        assert_eq!(slice_at(1.0, 0.0, &bounds), 2);
    }

    #[test]
    fn empty_counts_render_a_placeholder() {
        assert_eq!(render_pie_chart("t", &[], 3), "t\n(no data)\n");
    }
}
