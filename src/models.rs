//! Core data structures for mass-balance processing.
//!
//! Defines per-year instrument configurations, extracted day profiles,
//! and processing statistics used throughout the library.

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Instrument configuration for one deployment year.
///
/// Encodes the thermistor-string geometry and file quirks of a year band:
/// the offset of thermistor 1 relative to the ice/snow interface (positive
/// downward, in centimeters), the number of thermistors on the string, and
/// the count of corrupted leading data rows to discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearConfig {
    /// Offset of the first thermistor from the ice/snow interface, in cm.
    /// Negative values sit above the interface (in air or snow).
    pub sensor0_offset_cm: i32,

    /// Number of thermistors on the string for this year.
    pub thermistor_count: usize,

    /// Leading data rows to drop (bad first entry, secondary header lines).
    pub drop_rows: usize,
}

/// Provenance of the ice-thickness value attached to a day profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThicknessSource {
    /// Mean of the buoy's own thickness channel over the matched rows.
    Measured,
    /// Supplied by the caller.
    User,
    /// Located from the temperature profile at the ice/water interface.
    Inferred,
}

impl ThicknessSource {
    /// Provenance comment carried into the output profile.
    pub fn comment(&self) -> &'static str {
        match self {
            ThicknessSource::Measured => "hi measured by mbs;",
            ThicknessSource::User => "hi from user;",
            ThicknessSource::Inferred => "hi computed from mbs;",
        }
    }
}

/// One (depth, temperature) sample of a vertical profile.
/// Depth is in meters, positive downward from the ice/snow interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    pub depth_m: f64,
    pub temperature_c: f64,
}

/// One averaged vertical temperature profile for a single calendar day.
///
/// Produced by the extractor; ownership transfers to the caller. Samples are
/// sorted by depth ascending.
#[derive(Debug, Clone)]
pub struct DayProfile {
    /// Profile name, `mbs-YYYYMMDD`.
    pub name: String,

    /// Requested day (with the hour used for averaging, if any).
    pub date: NaiveDateTime,

    /// Site label.
    pub location: String,

    /// Ice thickness in meters.
    pub ice_thickness: f64,

    /// How the ice thickness was obtained.
    pub thickness_source: ThicknessSource,

    /// Mean snow depth over the matched rows, if the mast channel exists.
    pub snow_depth: Option<f64>,

    /// Geolocation is not recorded by the buoy files.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Depth-sorted temperature samples.
    pub samples: Vec<TemperatureSample>,
}

impl DayProfile {
    /// Render the profile as a long-format frame, each row tagged with the
    /// profile name, ice thickness, and variable label, matching the shape
    /// consumed by the downstream property-variability analysis.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let n = self.samples.len();
        let depths: Vec<f64> = self.samples.iter().map(|s| s.depth_m).collect();
        let temps: Vec<f64> = self.samples.iter().map(|s| s.temperature_c).collect();

        df![
            "y_mid" => depths,
            "temperature" => temps,
            "name" => vec![self.name.clone(); n],
            "length" => vec![self.ice_thickness; n],
            "ice thickness" => vec![self.ice_thickness; n],
            "variable" => vec!["temperature".to_string(); n],
        ]
    }
}

/// Statistics for one batch processing run.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub total_rows: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
