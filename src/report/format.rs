//! Text formatting for listings, run summaries and the full report.

use std::fmt::Display;

use crate::app::pipeline::RunOutput;
use crate::domain::{CountView, MeanView, PolyFit, RecordTable, ReportConfig};
use crate::plot::{render_fit_plot, render_hbar_chart, render_pie_chart, render_vbar_chart};
use crate::report::{
    TITLE_BY_JOB, TITLE_BY_LOCATION, TITLE_BY_SCORE, TITLE_JOB_COUNTS, TITLE_LOCATION_COUNTS, TITLE_REGRESSION,
    count_slices, mean_bars,
};

const KEY_WIDTH: usize = 32;

/// Pie radius (rows above the centre) used in the text report.
const PIE_RADIUS: usize = 6;

/// Everything `salary report` prints: five views, then the regression.
pub fn format_full_report(run: &RunOutput, config: &ReportConfig) -> String {
    let views = &run.views;
    let top = config.top_n;
    let mut out = format_run_summary(&run.table);

    let sections = [
        (
            format_mean_view(TITLE_BY_JOB, "job title", &views.by_job, top),
            render_hbar_chart(TITLE_BY_JOB, &mean_bars(&views.by_job, top), config.plot_width),
        ),
        (
            format_mean_view(TITLE_BY_SCORE, "company score", &views.by_score, top),
            render_vbar_chart(TITLE_BY_SCORE, &mean_bars(&views.by_score, top), config.plot_height),
        ),
        (
            format_mean_view(TITLE_BY_LOCATION, "location", &views.by_location, top),
            render_hbar_chart(TITLE_BY_LOCATION, &mean_bars(&views.by_location, top), config.plot_width),
        ),
        (
            format_count_view(TITLE_JOB_COUNTS, "job title", &views.job_counts, top),
            render_pie_chart(TITLE_JOB_COUNTS, &count_slices(&views.job_counts, top), PIE_RADIUS),
        ),
        (
            format_count_view(TITLE_LOCATION_COUNTS, "location", &views.location_counts, top),
            render_pie_chart(TITLE_LOCATION_COUNTS, &count_slices(&views.location_counts, top), PIE_RADIUS),
        ),
    ];

    for (listing, chart) in sections {
        out.push('\n');
        out.push_str(&listing);
        if config.plot {
            out.push('\n');
            out.push_str(&chart);
        }
    }

    // A failed fit is reported by the caller; the views stand on their own.
    if let Ok(fit) = &run.fit {
        out.push('\n');
        out.push_str(&format_fit_section(fit, config));
    }
    out
}

/// The regression section: header, chart (optional), metrics.
pub fn format_fit_section(fit: &PolyFit, config: &ReportConfig) -> String {
    let mut out = format!("=== {TITLE_REGRESSION} ===\n");
    if config.plot {
        out.push_str(&render_fit_plot(fit, config.plot_width, config.plot_height));
        out.push('\n');
    }
    out.push_str(&format_fit_summary(fit));
    out
}

/// Dataset header: source and how many rows each stage can use.
pub fn format_run_summary(table: &RecordTable) -> String {
    let mut out = String::new();
    out.push_str("=== Software Company Salary Analysis ===\n");
    out.push_str(&format!("Source: {}\n", table.source));
    out.push_str(&format!(
        "Rows: n={} | with avg salary={} | usable for regression={}\n",
        table.len(),
        table.rows_with_salary(),
        table.rows_fittable(),
    ));
    out
}

/// Listing of a grouped-mean view.
pub fn format_mean_view<K: Display>(title: &str, key_label: &str, view: &MeanView<K>, top_n: Option<usize>) -> String {
    let mut out = format!("=== {title} ===\n");
    out.push_str(format!("{key_label:<KEY_WIDTH$} {:>16}\n", "avg salary").trim_end());
    out.push('\n');
    out.push_str(&format!("{:-<KEY_WIDTH$} {:-<16}\n", "", ""));

    for (key, mean) in view.entries.iter().take(top_n.unwrap_or(usize::MAX)) {
        let value = mean.map(fmt_amount).unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "{:<KEY_WIDTH$} {value:>16}\n",
            truncate(&key.to_string(), KEY_WIDTH)
        ));
    }
    push_remainder(&mut out, view.len(), top_n);
    out
}

/// Listing of a value-count view with percentages of all counted rows.
pub fn format_count_view(title: &str, key_label: &str, view: &CountView, top_n: Option<usize>) -> String {
    let total: usize = view.entries.iter().map(|(_, c)| *c).sum();
    let mut out = format!("=== {title} ===\n");
    out.push_str(format!("{key_label:<KEY_WIDTH$} {:>8} {:>7}\n", "count", "share").trim_end());
    out.push('\n');
    out.push_str(&format!("{:-<KEY_WIDTH$} {:-<8} {:-<7}\n", "", "", ""));

    for (key, count) in view.entries.iter().take(top_n.unwrap_or(usize::MAX)) {
        let share = if total > 0 { 100.0 * *count as f64 / total as f64 } else { 0.0 };
        out.push_str(&format!(
            "{:<KEY_WIDTH$} {count:>8} {:>6.1}%\n",
            truncate(key, KEY_WIDTH),
            share
        ));
    }
    push_remainder(&mut out, view.len(), top_n);
    out
}

/// The two fit metrics echoed as text.
pub fn format_fit_summary(fit: &PolyFit) -> String {
    format!(
        "Degree: {}\nRows fitted: {}\nMean Squared Error (MSE): {:.2}\nR-squared (R²): {}\n",
        fit.degree,
        fit.x.len(),
        fit.mse,
        fmt_r2(fit.r2),
    )
}

fn push_remainder(out: &mut String, len: usize, top_n: Option<usize>) {
    if let Some(n) = top_n {
        if len > n {
            out.push_str(&format!("… {} more\n", len - n));
        }
    }
}

/// R² with two decimals, or `undefined` when it is `NaN`.
pub fn fmt_r2(r2: f64) -> String {
    if r2.is_nan() {
        "undefined".to_string()
    } else {
        format!("{r2:.2}")
    }
}

/// Two decimals with `,` thousands separators (e.g. `105,000.00`).
pub fn fmt_amount(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let fixed = format!("{:.2}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Shorten `s` to at most `max` characters, marking the cut with `.`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::app::pipeline::run_table;
    use crate::domain::{PolyDegree, SummaryView};
    use crate::error::AnalysisError;
    use crate::io::{LoadOptions, load_table};

    const SURVEY: &[u8] = b"Job Title;Company Score;Location;Salary\n\
A;4.0;X;$100,000 - $120,000\n\
B;4.0;Y;$80,000 - $90,000\n\
A;4.0;Z;$90,000 - $110,000\n\
C;3.5;X;$90,000 - N/A\n";

    fn survey_run() -> RunOutput {
        let table = load_table(SURVEY, "survey.csv", LoadOptions::default()).unwrap();
        run_table(Arc::new(table), PolyDegree::DEFAULT).unwrap()
    }

    const SECTION_TITLES: [&str; 5] =
        [TITLE_BY_JOB, TITLE_BY_SCORE, TITLE_BY_LOCATION, TITLE_JOB_COUNTS, TITLE_LOCATION_COUNTS];

    #[test]
    fn full_report_has_every_view_and_the_fit() {
        let run = survey_run();
        let txt = format_full_report(&run, &ReportConfig::default());
        for title in SECTION_TITLES {
            assert!(txt.contains(&format!("=== {title} ===")), "missing {title}:\n{txt}");
        }
        assert!(txt.contains("105,000.00"), "{txt}");
        assert!(txt.contains("85,000.00"), "{txt}");
        assert!(txt.contains(&format!("=== {TITLE_REGRESSION} ===")));
        assert!(txt.contains("Polynomial Regression (Degree=2)\nMSE: "), "{txt}");
        assert!(txt.contains(", R2: "), "{txt}");
    }

    #[test]
    fn full_report_without_a_fit_still_lists_views() {
        let mut run = survey_run();
        run.fit = Err(AnalysisError::Numerical("singular design".to_string()));
        let config = ReportConfig {
            plot: false,
            ..ReportConfig::default()
        };
        let txt = format_full_report(&run, &config);
        for title in SECTION_TITLES {
            assert!(txt.contains(&format!("=== {title} ===")), "missing {title}:\n{txt}");
        }
        assert!(!txt.contains(TITLE_REGRESSION));
        assert!(!txt.contains("MSE"));
    }

    #[test]
    fn amounts_get_thousands_separators() {
        assert_eq!(fmt_amount(105_000.0), "105,000.00");
        assert_eq!(fmt_amount(999.5), "999.50");
        assert_eq!(fmt_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(fmt_amount(-2_500.0), "-2,500.00");
        assert_eq!(fmt_amount(0.0), "0.00");
    }

    #[test]
    fn r2_reports_undefined() {
        assert_eq!(fmt_r2(f64::NAN), "undefined");
        assert_eq!(fmt_r2(0.456), "0.46");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Senior Data Engineer", 8), "Senior .");
        assert_eq!(truncate("short", 8), "short");
    }

    #[test]
    fn mean_view_listing() {
        let view: MeanView<String> = SummaryView {
            entries: vec![("A".to_string(), Some(105_000.0)), ("B".to_string(), None)],
        };
        let txt = format_mean_view("Average Salary by Job Title", "job title", &view, None);
        let mut lines = txt.lines();
        assert_eq!(lines.next(), Some("=== Average Salary by Job Title ==="));
        assert!(lines.next().unwrap().starts_with("job title"));
        lines.next();
        let a = lines.next().unwrap();
        assert!(a.starts_with("A "));
        assert!(a.ends_with("105,000.00"));
        assert!(lines.next().unwrap().ends_with("n/a"));
    }

    #[test]
    fn count_view_listing_with_limit() {
        let view: CountView = SummaryView {
            entries: vec![("X".to_string(), 3), ("Y".to_string(), 1)],
        };
        let txt = format_count_view("Location Frequency", "location", &view, Some(1));
        assert!(txt.contains(" 75.0%\n"), "{txt}");
        assert!(!txt.contains("\nY "));
        assert!(txt.ends_with("… 1 more\n"));
    }

    #[test]
    fn fit_summary_echoes_metrics() {
        let fit = PolyFit {
            degree: PolyDegree::DEFAULT,
            coefficients: vec![0.0; 3],
            x: vec![1.0, 2.0],
            y: vec![1.0, 2.0],
            y_pred: vec![1.0, 2.0],
            mse: 1234.5678,
            r2: 0.891,
        };
        assert_eq!(
            format_fit_summary(&fit),
            "Degree: 2\nRows fitted: 2\nMean Squared Error (MSE): 1234.57\nR-squared (R²): 0.89\n"
        );
    }
}
