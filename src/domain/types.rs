//! Shared domain types.
//!
//! These are plain values: the loader produces them, the aggregator and fitter
//! consume them, and the presentation layer only reads them.

use std::borrow::Borrow;
use std::path::PathBuf;

use clap::ValueEnum;
use ordered_float::OrderedFloat;

use crate::error::AnalysisError;

/// How to derive `Avg Salary` when exactly one half of a range parses.
///
/// The default drops such rows from the salary views and the fit.
/// `KnownHalf` gives the row-wise mean that skips the missing half, which is
/// what the original spreadsheet-style tool reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum PartialRange {
    /// Leave `Avg Salary` missing (the row drops out of every mean and the fit).
    #[default]
    Exclude,
    /// Use the half that parsed as the average.
    KnownHalf,
}

/// One cleaned survey row.
///
/// Missing values are explicit: blank text cells become `None`, and salary
/// halves that fail to parse become `None` rather than failing the row.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub job_title: Option<String>,
    pub company_score: Option<f64>,
    pub location: Option<String>,
    /// Raw `Salary` cell as read from the file.
    pub salary: String,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub avg_salary: Option<f64>,
}

/// The in-memory table for one loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    pub records: Vec<SurveyRecord>,
    /// Human-readable origin (file name, or `<memory>`).
    pub source: String,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows with a defined `Avg Salary`.
    pub fn rows_with_salary(&self) -> usize {
        self.records.iter().filter(|r| r.avg_salary.is_some()).count()
    }

    /// Rows usable for the regression (score and average both present).
    pub fn rows_fittable(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.company_score.is_some() && r.avg_salary.is_some())
            .count()
    }
}

/// Hashable company-score key.
pub type ScoreKey = OrderedFloat<f64>;

/// An ordered `(key, value)` listing: the shape of every aggregate view.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView<K, V> {
    pub entries: Vec<(K, V)>,
}

impl<K, V> Default for SummaryView<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K, V> SummaryView<K, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Look up the value for `key` (linear scan; views are small).
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }
}

/// Mean `Avg Salary` per group. `None` means the group had no defined salary.
pub type MeanView<K> = SummaryView<K, Option<f64>>;

/// Row count per group.
pub type CountView = SummaryView<String, usize>;

/// The five aggregate views computed from one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisViews {
    pub by_job: MeanView<String>,
    pub by_score: MeanView<ScoreKey>,
    pub by_location: MeanView<String>,
    pub job_counts: CountView,
    pub location_counts: CountView,
}

/// Polynomial degree for the salary regression, constrained to `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolyDegree(u8);

impl PolyDegree {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: PolyDegree = PolyDegree(2);

    pub fn new(degree: i64) -> Result<Self, AnalysisError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&degree) {
            Ok(Self(degree as u8))
        } else {
            Err(AnalysisError::InvalidDegree(degree))
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// Step up one degree, saturating at `MAX`.
    pub fn increment(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    /// Step down one degree, saturating at `MIN`.
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for PolyDegree {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PolyDegree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one polynomial fit of `Avg Salary` on `Company Score`.
///
/// `x`, `y` and `y_pred` are aligned and keep input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    pub degree: PolyDegree,
    /// Coefficients for `[1, x, x², …]`.
    pub coefficients: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub y_pred: Vec<f64>,
    pub mse: f64,
    /// `NaN` when undefined (constant target with a non-zero residual).
    pub r2: f64,
}

impl PolyFit {
    /// Evaluate the fitted polynomial at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Resolved settings for one report run (CLI or TUI).
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub csv_path: Option<PathBuf>,
    pub degree: PolyDegree,
    pub partial_range: PartialRange,
    /// Limit listing/chart rows per view (`None` = all).
    pub top_n: Option<usize>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            degree: PolyDegree::DEFAULT,
            partial_range: PartialRange::Exclude,
            top_n: None,
            plot: true,
            plot_width: 72,
            plot_height: 20,
        }
    }
}
