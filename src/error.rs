//! Error types.
//!
//! - `AnalysisError`: what the loader, aggregator and fitter can fail with.
//! - `AppError`: the binary boundary (message + process exit code).

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the load → aggregate → fit pipeline.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// Missing/malformed column, malformed salary range, unreadable CSV.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Polynomial degree outside the supported range.
    #[error("invalid polynomial degree {0} (supported: {min}..={max})", min = crate::domain::PolyDegree::MIN, max = crate::domain::PolyDegree::MAX)]
    InvalidDegree(i64),

    /// The file parsed but no rows survived exclusion.
    #[error("no usable rows: {0}")]
    EmptyInput(String),

    /// The least-squares solve did not produce a finite solution.
    #[error("numerical error: {0}")]
    Numerical(String),

    #[error("failed to read '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl AnalysisError {
    /// Exit code used when this error ends the process.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalysisError::DataFormat(_) | AnalysisError::InvalidDegree(_) | AnalysisError::Io { .. } => 2,
            AnalysisError::EmptyInput(_) => 3,
            AnalysisError::Numerical(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
