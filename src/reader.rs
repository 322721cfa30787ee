//! Per-year schema normalization of raw mass-balance files.
//!
//! Each site-year file mixes fixed fields (Year, DOY, time-of-day, snow
//! depth channels, ice thickness) with a run of numbered thermistor channels
//! whose physical depth depends on that year's string geometry. This module
//! loads one raw CSV and produces a table whose thermistor columns are
//! relabeled to their centimeter offset from the ice/snow interface, with
//! sentinel readings masked and a derived `datetime` column.
//!
//! Depth offsets are positive from the ice surface downward, so equal labels
//! are directly comparable across years regardless of the original channel
//! numbering.

use crate::constants::{
    DATETIME_COLUMN, DOY_COLUMN, SENTINEL_VALUE, SNOW_MAST_COLUMN, THERMISTOR_SPACING_CM,
    TIME_COLUMN, YEAR_COLUMN,
};
use crate::error::{MbsError, Result};
use crate::models::YearConfig;
use crate::schema::{year_config, year_from_filename};
use chrono::NaiveDate;
use polars::prelude::*;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static THERMISTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^T(\d+)$").expect("valid thermistor pattern"));
static SNOW_PROBE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d)").expect("valid snow probe pattern"));

/// Load one raw mass-balance file and normalize it to the common shape.
///
/// The deployment year is taken from the filename; a year with no defined
/// instrument configuration is rejected rather than guessed.
pub fn read_mbs_file(path: &Path) -> Result<DataFrame> {
    let year = year_from_filename(path)?;
    let cfg = year_config(year).ok_or(MbsError::UnsupportedYear {
        year,
        path: path.to_path_buf(),
    })?;
    debug!(
        "Year {}: sensor 0 at {} cm, {} thermistors, dropping {} leading row(s)",
        year, cfg.sensor0_offset_cm, cfg.thermistor_count, cfg.drop_rows
    );

    // Read everything as text; numeric coercion happens after the corrupted
    // leading rows (units lines, secondary headers) are gone.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let df = df.slice(cfg.drop_rows as i64, df.height());
    let df = rename_columns(df, &cfg)?;
    let df = coerce_and_mask(df)?;
    with_datetime(df, path)
}

/// Relabel depth-indexed and irregularly named columns to canonical names.
///
/// `T<n>` channels become their centimeter offset from the ice/snow
/// interface, the mast snow sounder becomes `Hs`, auxiliary probes `Hs_<n>`,
/// and the time-of-day column gets its canonical name.
fn rename_columns(mut df: DataFrame, cfg: &YearConfig) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut renames: Vec<(String, String)> = Vec::new();
    let mut thermistors = 0usize;
    for name in &names {
        if let Some(caps) = THERMISTOR_RE.captures(name) {
            let Ok(index) = caps[1].parse::<i32>() else {
                continue;
            };
            let offset = cfg.sensor0_offset_cm + (index - 1) * THERMISTOR_SPACING_CM;
            renames.push((name.clone(), offset.to_string()));
            thermistors += 1;
        } else if name.starts_with(SNOW_MAST_COLUMN) {
            if name.contains("Mast") {
                renames.push((name.clone(), SNOW_MAST_COLUMN.to_string()));
            } else if let Some(caps) = SNOW_PROBE_RE.captures(name) {
                renames.push((name.clone(), format!("Hs_{}", &caps[1])));
            }
        } else if name.contains("UTC time") {
            renames.push((name.clone(), TIME_COLUMN.to_string()));
        }
    }

    if thermistors != cfg.thermistor_count {
        warn!(
            "Expected {} thermistor channels, found {}",
            cfg.thermistor_count, thermistors
        );
    }

    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(df)
}

/// Coerce every column to Float64 (unparseable text becomes missing) and
/// replace the datalogger sentinel with missing values.
fn coerce_and_mask(df: DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let casts: Vec<Expr> = names
        .iter()
        .map(|n| col(n.as_str()).cast(DataType::Float64))
        .collect();
    let masks: Vec<Expr> = names
        .iter()
        .map(|n| {
            when(col(n.as_str()).eq(lit(SENTINEL_VALUE)))
                .then(lit(NULL))
                .otherwise(col(n.as_str()))
                .alias(n.as_str())
        })
        .collect();

    Ok(df.lazy().with_columns(casts).with_columns(masks).collect()?)
}

/// Derive the `datetime` column from Year + DOY + time-of-day (HHMM).
/// Day-of-year 1 is January 1. Missing or out-of-range components are a
/// format error carrying the offending row.
fn with_datetime(mut df: DataFrame, path: &Path) -> Result<DataFrame> {
    for required in [YEAR_COLUMN, DOY_COLUMN, TIME_COLUMN] {
        if df.column(required).is_err() {
            return Err(MbsError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let years = df.column(YEAR_COLUMN)?.f64()?;
    let doys = df.column(DOY_COLUMN)?.f64()?;
    let times = df.column(TIME_COLUMN)?.f64()?;

    let mut millis: Vec<Option<i64>> = Vec::with_capacity(df.height());
    for (row, ((year, doy), time)) in years
        .into_iter()
        .zip(doys.into_iter())
        .zip(times.into_iter())
        .enumerate()
    {
        let (Some(year), Some(doy), Some(time)) = (year, doy, time) else {
            return Err(MbsError::Timestamp {
                path: path.to_path_buf(),
                reason: format!("row {row}: missing Year/DOY/time component"),
            });
        };
        let ts = timestamp_millis(year, doy, time).ok_or_else(|| MbsError::Timestamp {
            path: path.to_path_buf(),
            reason: format!("row {row}: invalid components ({year}, {doy}, {time})"),
        })?;
        millis.push(Some(ts));
    }

    let datetimes = Int64Chunked::from_iter_options(DATETIME_COLUMN.into(), millis.into_iter())
        .into_datetime(TimeUnit::Milliseconds, None);
    df.with_column(datetimes.into_column())?;
    Ok(df)
}

fn timestamp_millis(year: f64, doy: f64, hhmm: f64) -> Option<i64> {
    if !(0.0..=9999.0).contains(&year) || doy < 1.0 || !(0.0..=2400.0).contains(&hhmm) {
        return None;
    }
    let date = NaiveDate::from_yo_opt(year as i32, doy as u32)?;
    let hhmm = hhmm as u32;
    let dt = date.and_hms_opt(hhmm / 100, hhmm % 100, 0)?;
    Some(dt.and_utc().timestamp_millis())
}
