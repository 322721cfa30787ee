//! Application constants for the MBS processor
//!
//! This module contains the physical constants, sentinel values, canonical
//! column names, and default values used throughout the application.

// =============================================================================
// Instrument Geometry and Physical Constants
// =============================================================================

/// Vertical spacing between adjacent thermistors, in centimeters.
/// Fixed at 10 cm across all deployment years.
pub const THERMISTOR_SPACING_CM: i32 = 10;

/// Sentinel value used by the datalogger for invalid readings.
pub const SENTINEL_VALUE: f64 = -9999.0;

/// Freezing point of seawater in degrees Celsius. A thermistor reading above
/// this value is taken to sit below the ice/water interface.
pub const SEAWATER_FREEZING_C: f64 = -1.8;

/// Centimeters per meter, for depth-label unit conversion.
pub const CM_PER_M: f64 = 100.0;

/// Daytime averaging window (inclusive hour bounds) used when the requested
/// day carries no specific hour.
pub const DAYTIME_HOUR_MIN: u32 = 6;
pub const DAYTIME_HOUR_MAX: u32 = 18;

// =============================================================================
// Canonical Column Names
// =============================================================================

/// Derived timestamp column added by the normalizer.
pub const DATETIME_COLUMN: &str = "datetime";

/// Observation year column in the raw files.
pub const YEAR_COLUMN: &str = "Year";

/// Day-of-year column in the raw files (day 1 = Jan 1).
pub const DOY_COLUMN: &str = "DOY";

/// Canonical name for the time-of-day column (HHMM integer). Raw files name
/// it inconsistently; any column containing "UTC time" is renamed to this.
pub const TIME_COLUMN: &str = "Time (hhmm)";

/// Measured ice thickness column.
pub const ICE_THICKNESS_COLUMN: &str = "Hi";

/// Canonical snow-depth column for the mast-mounted sounder.
pub const SNOW_MAST_COLUMN: &str = "Hs";

// =============================================================================
// Freeze-up Observation File
// =============================================================================

/// Header lines to skip before the tab-separated freeze-up table starts.
pub const FREEZEUP_HEADER_LINES: usize = 7;

/// Literal used for missing values in the freeze-up table.
pub const FREEZEUP_MISSING: &str = "-";

/// Year index column of the freeze-up table.
pub const FREEZEUP_YEAR_COLUMN: &str = "year";

/// First-choice freeze-up source column.
pub const FREEZEUP_SOURCE_PRIMARY: &str = "he";

/// Fallback freeze-up source column.
pub const FREEZEUP_SOURCE_SECONDARY: &str = "jl";

/// Reconciled column built by the loader.
pub const FREEZEUP_SOURCE_ALL: &str = "all";

// =============================================================================
// Defaults
// =============================================================================

/// Default observation site label (Utqiagvik / Barrow, AK).
pub const DEFAULT_LOCATION: &str = "BRW";

/// Raw observation file extension.
pub const DEFAULT_FILE_EXTENSION: &str = "csv";

/// Default recursion depth for file enumeration (0 = root directory only).
pub const DEFAULT_SEARCH_DEPTH: usize = 0;

/// Default output file name for the normalized table.
pub const DEFAULT_OUTPUT_FILE: &str = "mbs_data.parquet";
