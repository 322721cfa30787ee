//! Single-day temperature profile extraction.
//!
//! Reduces the normalized multi-year table to one averaged vertical
//! temperature profile for a requested calendar day, determines the ice and
//! snow thickness, and anchors the bounded variant to the physical ice
//! column. Depth columns are recognized by their numeric labels (centimeter
//! offsets assigned by the normalizer) and converted to meters on output.

use crate::constants::{
    CM_PER_M, DATETIME_COLUMN, DAYTIME_HOUR_MAX, DAYTIME_HOUR_MIN, ICE_THICKNESS_COLUMN,
    SEAWATER_FREEZING_C, SNOW_MAST_COLUMN,
};
use crate::error::{MbsError, Result};
use crate::models::{DayProfile, TemperatureSample, ThicknessSource};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;
use tracing::{debug, info};

/// Options shared by both extraction variants.
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    /// Site label attached to the profile.
    pub location: String,

    /// User-supplied ice thickness in meters, used when the buoy recorded
    /// no thickness for the day.
    pub ice_thickness: Option<f64>,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            location: crate::constants::DEFAULT_LOCATION.to_string(),
            ice_thickness: None,
        }
    }
}

/// Extract the full day profile, keeping every depth sample as measured.
pub fn full_profile(
    data: &DataFrame,
    day: NaiveDateTime,
    options: &ProfileOptions,
) -> Result<Option<DayProfile>> {
    extract(data, day, options, false)
}

/// Extract the day profile trimmed to the physically plausible ice column,
/// with the deepest retained sample anchored to the ice-bottom depth.
pub fn bounded_profile(
    data: &DataFrame,
    day: NaiveDateTime,
    options: &ProfileOptions,
) -> Result<Option<DayProfile>> {
    extract(data, day, options, true)
}

fn extract(
    data: &DataFrame,
    day: NaiveDateTime,
    options: &ProfileOptions,
    bounded: bool,
) -> Result<Option<DayProfile>> {
    let day_data = data.filter(&date_mask(data, day.date())?)?;
    if day_data.height() == 0 {
        info!("No data for selected day {}", day.date());
        return Ok(None);
    }

    let depth_cols = depth_columns(&day_data);
    let mut pairs = averaged_profile(&day_data, day.time().hour(), &depth_cols)?;
    if pairs.is_empty() {
        info!("No usable temperature samples for {}", day.date());
        return Ok(None);
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (ice_thickness, thickness_source) =
        determine_ice_thickness(&day_data, options.ice_thickness, &pairs, day)?;
    let snow_depth = column_mean(&day_data, SNOW_MAST_COLUMN);

    // Depth labels are centimeter offsets; the profile is emitted in meters.
    let mut samples: Vec<TemperatureSample> = pairs
        .iter()
        .map(|&(depth_cm, temperature_c)| TemperatureSample {
            depth_m: depth_cm / CM_PER_M,
            temperature_c,
        })
        .collect();

    if bounded {
        samples = trim_to_ice_column(samples, ice_thickness);
        if samples.is_empty() {
            info!(
                "No samples within the ice column for {} (thickness {:.2} m)",
                day.date(),
                ice_thickness
            );
            return Ok(None);
        }
    }

    Ok(Some(DayProfile {
        name: format!("mbs-{}", day.format("%Y%m%d")),
        date: day,
        location: options.location.clone(),
        ice_thickness,
        thickness_source,
        snow_depth,
        latitude: None,
        longitude: None,
        samples,
    }))
}

/// Rows whose timestamp falls on the given calendar day.
fn date_mask(data: &DataFrame, date: NaiveDate) -> Result<BooleanChunked> {
    let datetimes = data.column(DATETIME_COLUMN)?.datetime()?;
    Ok(datetimes
        .as_datetime_iter()
        .map(|dt| Some(dt.is_some_and(|dt| dt.date() == date)))
        .collect())
}

/// Columns whose label is numeric, i.e. the depth-offset channels.
fn depth_columns(data: &DataFrame) -> Vec<(f64, String)> {
    data.get_column_names_str()
        .iter()
        .filter_map(|name| name.parse::<f64>().ok().map(|d| (d, name.to_string())))
        .collect()
}

/// Average the depth channels over the day with the fallback chain:
/// exact hour for a non-midnight request, the daytime window otherwise,
/// and the whole day when either yields nothing.
fn averaged_profile(
    day_data: &DataFrame,
    hour: u32,
    depth_cols: &[(f64, String)],
) -> Result<Vec<(f64, f64)>> {
    let window = if hour != 0 {
        day_data.filter(&hour_mask(day_data, |h| h == hour)?)?
    } else {
        day_data.filter(&hour_mask(day_data, |h| {
            (DAYTIME_HOUR_MIN..=DAYTIME_HOUR_MAX).contains(&h)
        })?)?
    };

    let mut pairs = mean_profile(&window, depth_cols)?;
    if pairs.is_empty() {
        debug!("Averaging window empty, falling back to daily mean");
        pairs = mean_profile(day_data, depth_cols)?;
    }
    Ok(pairs)
}

fn hour_mask(data: &DataFrame, pred: impl Fn(u32) -> bool) -> Result<BooleanChunked> {
    let datetimes = data.column(DATETIME_COLUMN)?.datetime()?;
    Ok(datetimes
        .as_datetime_iter()
        .map(|dt| Some(dt.is_some_and(|dt| pred(dt.time().hour()))))
        .collect())
}

/// Per-column means with missing values dropped; columns that stay missing
/// after averaging are omitted.
fn mean_profile(window: &DataFrame, depth_cols: &[(f64, String)]) -> Result<Vec<(f64, f64)>> {
    let mut pairs = Vec::with_capacity(depth_cols.len());
    for (depth_cm, name) in depth_cols {
        if let Some(mean) = window.column(name)?.f64()?.mean() {
            pairs.push((*depth_cm, mean));
        }
    }
    Ok(pairs)
}

/// Mean of a scalar channel over the matched rows, `None` when the channel
/// is absent or entirely missing.
fn column_mean(day_data: &DataFrame, name: &str) -> Option<f64> {
    day_data
        .column(name)
        .ok()
        .and_then(|c| c.f64().ok())
        .and_then(|ca| ca.mean())
}

/// Ice thickness in meters, preferring the buoy's own reading, then the
/// user-supplied value, then inference from the profile: the second sorted
/// depth whose temperature exceeds the seawater freezing point marks the
/// ice/water interface.
fn determine_ice_thickness(
    day_data: &DataFrame,
    user_thickness: Option<f64>,
    pairs_cm: &[(f64, f64)],
    day: NaiveDateTime,
) -> Result<(f64, ThicknessSource)> {
    if let Some(measured) = column_mean(day_data, ICE_THICKNESS_COLUMN) {
        return Ok((measured, ThicknessSource::Measured));
    }
    if let Some(user) = user_thickness {
        return Ok((user, ThicknessSource::User));
    }

    let warm_depths: Vec<f64> = pairs_cm
        .iter()
        .filter(|(_, t)| *t > SEAWATER_FREEZING_C)
        .map(|(d, _)| *d)
        .collect();
    match warm_depths.get(1) {
        Some(depth_cm) => Ok((depth_cm / CM_PER_M, ThicknessSource::Inferred)),
        None => Err(MbsError::ThicknessInference {
            day: day.date().to_string(),
        }),
    }
}

/// Trim a depth-sorted meter profile to the ice column.
///
/// Upper bound: the deepest sample still above the ice/snow interface
/// (depth < 0), or the shallowest sample when none is negative. Lower bound:
/// the shallowest sample below the ice bottom (depth > thickness), or the
/// deepest sample when none exceeds it. The bounds cross when the ice bottom
/// sits above every sample (a negative or implausibly small thickness); the
/// trim is then empty. Otherwise the deepest retained sample is pinned to
/// the thickness value; its temperature stays as measured.
fn trim_to_ice_column(
    samples: Vec<TemperatureSample>,
    ice_thickness: f64,
) -> Vec<TemperatureSample> {
    let upper = samples
        .iter()
        .rposition(|s| s.depth_m < 0.0)
        .unwrap_or(0);
    let lower = samples
        .iter()
        .position(|s| s.depth_m > ice_thickness)
        .unwrap_or(samples.len() - 1);
    if upper > lower {
        return Vec::new();
    }

    let mut trimmed: Vec<TemperatureSample> = samples[upper..=lower].to_vec();
    if let Some(last) = trimmed.last_mut() {
        last.depth_m = ice_thickness;
    }
    trimmed
}
