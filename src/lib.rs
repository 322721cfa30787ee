//! MBS Processor Library
//!
//! A Rust library for normalizing SIZONet ice mass-balance buoy (thermistor
//! string) observations from per-year CSV files into a single depth-labeled
//! Parquet table, and for extracting single-day vertical temperature profiles
//! from the normalized data.
//!
//! This library provides tools for:
//! - Enumerating raw data files with a bounded recursion depth
//! - Applying per-year schema rules (thermistor offsets, corrupted header
//!   rows) that encode a decade of changing instrument geometry
//! - Masking sentinel readings and deriving timestamps from day-of-year fields
//! - Building averaged day profiles anchored to the ice surface and bottom
//! - Loading and reconciling yearly freeze-up observations

pub mod cli {
    pub mod args;
    pub mod commands;
}
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod freezeup;
pub mod models;
pub mod processor;
pub mod profile;
pub mod reader;
pub mod schema;

pub use config::{ProcessingOptions, SiteConfig};
pub use error::{MbsError, Result};
pub use models::{DayProfile, ProcessingStats, ThicknessSource, YearConfig};
pub use processor::DatasetProcessor;
