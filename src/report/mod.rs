//! Reporting utilities: chart series from views, and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation/fitting code stays clean and testable
//! - output changes are localized (golden tests live next to them)

use std::fmt::Display;

use crate::domain::{CountView, MeanView};

pub mod format;

pub use format::*;

pub const TITLE_BY_JOB: &str = "Average Salary by Job Title";
pub const TITLE_BY_SCORE: &str = "Average Salary by Company Score";
pub const TITLE_BY_LOCATION: &str = "Average Salary by Location";
pub const TITLE_JOB_COUNTS: &str = "Job Title Frequency";
pub const TITLE_LOCATION_COUNTS: &str = "Location Frequency";
pub const TITLE_REGRESSION: &str = "Polynomial Regression: Company Score vs Average Salary";

/// Label for the slice that collects everything past `top_n`.
pub const OTHER_LABEL: &str = "(other)";

/// Bars for a mean view: defined means only, in view order, first `top_n`.
pub fn mean_bars<K: Display>(view: &MeanView<K>, top_n: Option<usize>) -> Vec<(String, f64)> {
    view.entries
        .iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .take(top_n.unwrap_or(usize::MAX))
        .collect()
}

/// Pie slices for a count view. With `top_n`, the remainder is folded into
/// one trailing `(other)` slice so percentages still cover every row.
pub fn count_slices(view: &CountView, top_n: Option<usize>) -> Vec<(String, usize)> {
    let limit = top_n.unwrap_or(usize::MAX);
    let mut slices: Vec<(String, usize)> = view.entries.iter().take(limit).cloned().collect();
    let rest: usize = view.entries.iter().skip(limit).map(|(_, c)| *c).sum();
    if rest > 0 {
        slices.push((OTHER_LABEL.to_string(), rest));
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SummaryView;

    #[test]
    fn mean_bars_skip_undefined_means() {
        let view: MeanView<String> = SummaryView {
            entries: vec![
                ("A".to_string(), Some(3.0)),
                ("B".to_string(), Some(2.0)),
                ("C".to_string(), None),
            ],
        };
        assert_eq!(
            mean_bars(&view, None),
            vec![("A".to_string(), 3.0), ("B".to_string(), 2.0)]
        );
        assert_eq!(mean_bars(&view, Some(1)), vec![("A".to_string(), 3.0)]);
    }

    #[test]
    fn count_slices_fold_the_tail() {
        let view: CountView = SummaryView {
            entries: vec![("A".to_string(), 5), ("B".to_string(), 3), ("C".to_string(), 2)],
        };
        assert_eq!(count_slices(&view, None).len(), 3);
        assert_eq!(
            count_slices(&view, Some(1)),
            vec![("A".to_string(), 5), (OTHER_LABEL.to_string(), 5)]
        );
    }
}
