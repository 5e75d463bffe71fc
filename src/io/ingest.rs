//! CSV ingest and salary cleaning.
//!
//! This module turns a semicolon-delimited salary survey into a typed
//! `RecordTable`:
//!
//! - **Strict schema** for the four required columns (clear `DataFormat` errors)
//! - **Tolerant values**: unparsable salary halves and scores become missing
//! - **Strict range shape**: a salary cell must be empty or exactly `min - max`
//! - **No aggregation here**: grouping and fitting live elsewhere

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;

use crate::domain::{PartialRange, RecordTable, SurveyRecord};
use crate::error::AnalysisError;

pub const COL_JOB_TITLE: &str = "Job Title";
pub const COL_COMPANY_SCORE: &str = "Company Score";
pub const COL_LOCATION: &str = "Location";
pub const COL_SALARY: &str = "Salary";

const REQUIRED_COLUMNS: [&str; 4] = [COL_JOB_TITLE, COL_COMPANY_SCORE, COL_LOCATION, COL_SALARY];

/// Separator between the two halves of a salary range.
const RANGE_SEPARATOR: &str = " - ";

/// Options that change what a load produces (and therefore its cache key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LoadOptions {
    pub partial_range: PartialRange,
}

/// Raw row shape as it appears in the file. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Job Title", default)]
    job_title: Option<String>,
    #[serde(rename = "Company Score", default, deserialize_with = "csv::invalid_option")]
    company_score: Option<f64>,
    #[serde(rename = "Location", default)]
    location: Option<String>,
    #[serde(rename = "Salary", default)]
    salary: Option<String>,
}

/// Read and parse a survey file from disk.
pub fn load_path(path: &Path, options: LoadOptions) -> Result<RecordTable, AnalysisError> {
    let bytes = read_source(path)?;
    load_table(&bytes, &source_label(path), options)
}

/// Read the raw bytes of a survey file.
pub fn read_source(path: &Path) -> Result<Vec<u8>, AnalysisError> {
    std::fs::read(path).map_err(|e| AnalysisError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Short label for a path (file name when available).
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse survey CSV content into a cleaned table.
///
/// A header-only file yields an empty table; deciding whether that is an error
/// is up to the caller.
pub fn load_table(bytes: &[u8], source: &str, options: LoadOptions) -> Result<RecordTable, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let raw_headers = reader
        .headers()
        .map_err(|e| AnalysisError::DataFormat(format!("failed to read CSV header: {e}")))?
        .clone();
    let headers = clean_headers(&raw_headers);
    ensure_required_columns_exist(&build_header_map(&headers))?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
            AnalysisError::DataFormat(format!("line {line}: {e}"))
        })?;
        // Records start on line 2 (line 1 is the header).
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 2);

        let raw: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| AnalysisError::DataFormat(format!("line {line}: {e}")))?;

        let row = clean_row(raw, options.partial_range)
            .map_err(|msg| AnalysisError::DataFormat(format!("line {line}: {msg}")))?;
        records.push(row);
    }

    let table = RecordTable {
        records,
        source: source.to_string(),
    };
    log::info!(
        "loaded {} rows from {} ({} without avg salary)",
        table.len(),
        table.source,
        table.len() - table.rows_with_salary(),
    );
    Ok(table)
}

fn clean_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn build_header_map(headers: &StringRecord) -> HashMap<&str, usize> {
    headers.iter().enumerate().map(|(idx, name)| (name, idx)).collect()
}

fn ensure_required_columns_exist(header_map: &HashMap<&str, usize>) -> Result<(), AnalysisError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AnalysisError::DataFormat(format!("missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn clean_row(raw: RawRow, partial_range: PartialRange) -> Result<SurveyRecord, String> {
    let salary = raw.salary.unwrap_or_default();
    let (min_salary, max_salary) = parse_salary_range(&salary)?;
    let avg_salary = average_salary(min_salary, max_salary, partial_range);

    Ok(SurveyRecord {
        job_title: non_blank(raw.job_title),
        company_score: raw.company_score.filter(|v| v.is_finite()),
        location: non_blank(raw.location),
        salary,
        min_salary,
        max_salary,
        avg_salary,
    })
}

/// Split a `"$min - $max"` cell into its two numeric halves.
///
/// `$` and thousands separators are ignored; a half that still does not parse
/// is `None`. An empty cell is two missing halves. Anything that is not
/// exactly two halves is an error.
pub fn parse_salary_range(raw: &str) -> Result<(Option<f64>, Option<f64>), String> {
    let cleaned = raw.replace('$', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok((None, None));
    }

    let parts: Vec<&str> = cleaned.split(RANGE_SEPARATOR).collect();
    match parts.as_slice() {
        [min, max] => Ok((parse_amount(min), parse_amount(max))),
        _ => Err(format!(
            "malformed salary range '{raw}' (expected '$<min> - $<max>')"
        )),
    }
}

/// Combine the two halves into `Avg Salary`.
pub fn average_salary(min: Option<f64>, max: Option<f64>, partial_range: PartialRange) -> Option<f64> {
    match (min, max) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (Some(v), None) | (None, Some(v)) => match partial_range {
            PartialRange::Exclude => None,
            PartialRange::KnownHalf => Some(v),
        },
        (None, None) => None,
    }
}

fn parse_amount(s: &str) -> Option<f64> {
    let digits: String = s.trim().chars().filter(|&c| c != ',').collect();
    let v = digits.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
