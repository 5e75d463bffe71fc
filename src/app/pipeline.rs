//! Shared "analysis pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (cached) -> aggregate -> fit
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;
use std::sync::Arc;

use crate::analysis::analyze;
use crate::domain::{AnalysisViews, PolyDegree, PolyFit, RecordTable, ReportConfig};
use crate::error::AnalysisError;
use crate::fit::fit_polynomial;
use crate::io::{LoadCache, LoadOptions};

/// All computed outputs for one loaded table.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: Arc<RecordTable>,
    /// Computed once per table.
    pub views: AnalysisViews,
    /// The regression can fail on its own (e.g. no company scores) while the
    /// views are still worth showing.
    pub fit: Result<PolyFit, AnalysisError>,
}

impl RunOutput {
    /// Re-run only the regression at a new degree.
    pub fn refit(&mut self, degree: PolyDegree) {
        self.fit = fit_polynomial(&self.table, degree);
    }
}

/// Load `path` through `cache` and run the full pipeline.
pub fn run_path(cache: &LoadCache, path: &Path, config: &ReportConfig) -> Result<RunOutput, AnalysisError> {
    let options = LoadOptions {
        partial_range: config.partial_range,
    };
    let table = cache.load_path(path, options)?;
    run_table(table, config.degree)
}

/// Aggregate and fit an already-loaded table.
///
/// A table without a single defined `Avg Salary` is `EmptyInput`: it parsed,
/// but there is nothing to analyze.
pub fn run_table(table: Arc<RecordTable>, degree: PolyDegree) -> Result<RunOutput, AnalysisError> {
    if table.rows_with_salary() == 0 {
        return Err(AnalysisError::EmptyInput(format!(
            "{} has {} rows but none with a parsable `Salary` range",
            table.source,
            table.len()
        )));
    }

    let views = analyze(&table);
    let fit = fit_polynomial(&table, degree);
    if let Err(e) = &fit {
        log::warn!("regression unavailable for {}: {e}", table.source);
    }

    Ok(RunOutput { table, views, fit })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVEY: &[u8] = b"Job Title;Company Score;Location;Salary\n\
A;4.5;X;$100,000 - $120,000\n\
B;4.5;Y;$80,000 - $90,000\n\
A;4.5;X;$100,000 - $100,000\n";

    fn load(bytes: &[u8]) -> Arc<RecordTable> {
        LoadCache::new()
            .load_bytes(bytes, "survey.csv", LoadOptions::default())
            .unwrap()
    }

    #[test]
    fn end_to_end_views_and_fit() {
        let run = run_table(load(SURVEY), PolyDegree::DEFAULT).unwrap();
        assert_eq!(run.views.by_job.get("A"), Some(&Some(105_000.0)));
        assert_eq!(run.views.by_job.get("B"), Some(&Some(85_000.0)));
        assert_eq!(run.views.job_counts.get("A"), Some(&2));
        assert_eq!(run.views.job_counts.get("B"), Some(&1));

        let fit = run.fit.as_ref().unwrap();
        assert_eq!(fit.x.len(), 3);
        // Every row shares one score, so the best fit is the mean salary.
        let mean = (110_000.0 + 85_000.0 + 100_000.0) / 3.0;
        for p in &fit.y_pred {
            assert!((p - mean).abs() < 1e-6, "prediction {p}");
        }
    }

    #[test]
    fn refit_changes_only_the_regression() {
        let mut run = run_table(load(SURVEY), PolyDegree::DEFAULT).unwrap();
        let views = run.views.clone();
        run.refit(PolyDegree::new(4).unwrap());
        assert_eq!(run.fit.as_ref().unwrap().degree.get(), 4);
        assert_eq!(run.views, views);
    }

    #[test]
    fn no_salaries_is_empty_input() {
        let bytes = b"Job Title;Company Score;Location;Salary\nA;4.0;X;N/A - N/A\n";
        let err = run_table(load(bytes), PolyDegree::DEFAULT).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }

    #[test]
    fn missing_scores_keep_views_but_fail_the_fit() {
        let bytes = b"Job Title;Company Score;Location;Salary\nA;;X;$1 - $3\n";
        let run = run_table(load(bytes), PolyDegree::DEFAULT).unwrap();
        assert_eq!(run.views.by_job.get("A"), Some(&Some(2.0)));
        assert!(matches!(run.fit, Err(AnalysisError::EmptyInput(_))));
    }

    #[test]
    fn run_path_goes_through_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(&path, SURVEY).unwrap();

        let cache = LoadCache::new();
        let config = ReportConfig::default();
        let first = run_path(&cache, &path, &config).unwrap();
        let second = run_path(&cache, &path, &config).unwrap();
        assert!(Arc::ptr_eq(&first.table, &second.table));
        assert_eq!(cache.len(), 1);
    }
}
