//! Error handling for mass-balance processing operations.
//!
//! Provides error types with file-path context for enumeration, per-year
//! normalization, profile extraction, and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MbsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Cannot extract year from filename: {path} - {reason}")]
    YearToken { path: PathBuf, reason: String },

    #[error("No instrument configuration defined for year {year} (file: {path})")]
    UnsupportedYear { year: i32, path: PathBuf },

    #[error("Invalid timestamp components in file: {path} - {reason}")]
    Timestamp { path: PathBuf, reason: String },

    #[error("Missing required column '{column}' in file: {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Cannot infer ice thickness for {day}: fewer than two depths above freezing")]
    ThicknessInference { day: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, MbsError>;
