//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cleaned survey rows and the loaded table (`SurveyRecord`, `RecordTable`)
//! - aggregate view shapes (`SummaryView`, `AnalysisViews`)
//! - regression inputs/outputs (`PolyDegree`, `PolyFit`)
//! - resolved run settings (`ReportConfig`)

pub mod types;

pub use types::*;
