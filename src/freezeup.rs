//! Freeze-up observation loading and reconciliation.
//!
//! The site keeps a small tab-separated table of yearly freeze-up
//! day-of-year observations from two observers. The loader reconciles the
//! two candidate columns into one, preferring the first source and filling
//! its gaps from the second. A label year Y names the winter that starts in
//! the autumn of year Y-1, so dates are reconstructed from (Y-1, DOY).

use crate::constants::{
    FREEZEUP_HEADER_LINES, FREEZEUP_MISSING, FREEZEUP_SOURCE_ALL, FREEZEUP_SOURCE_PRIMARY,
    FREEZEUP_SOURCE_SECONDARY, FREEZEUP_YEAR_COLUMN,
};
use crate::error::{MbsError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Load the freeze-up observation table.
///
/// Skips the fixed header block, treats the `-` literal as missing, and adds
/// the reconciled `all` column.
pub fn load_freezeup(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(FREEZEUP_HEADER_LINES)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b'\t')
                .with_null_values(Some(NullValues::AllColumnsSingle(FREEZEUP_MISSING.into()))),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    for required in [
        FREEZEUP_YEAR_COLUMN,
        FREEZEUP_SOURCE_PRIMARY,
        FREEZEUP_SOURCE_SECONDARY,
    ] {
        if df.column(required).is_err() {
            return Err(MbsError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    Ok(df
        .lazy()
        .with_column(
            when(col(FREEZEUP_SOURCE_PRIMARY).is_not_null())
                .then(col(FREEZEUP_SOURCE_PRIMARY))
                .otherwise(col(FREEZEUP_SOURCE_SECONDARY))
                .alias(FREEZEUP_SOURCE_ALL),
        )
        .collect()?)
}

/// Freeze-up dates for the requested label years (all years when `None`).
///
/// An unknown source column is a soft failure: a warning is logged and an
/// empty map returned. Years with no recorded day-of-year are skipped with
/// a warning.
pub fn freezeup_date_of_year(
    freezeup: &DataFrame,
    years: Option<&[i32]>,
    source: &str,
) -> Result<HashMap<i32, NaiveDate>> {
    if freezeup.column(source).is_err() {
        warn!("Freeze-up source '{source}' not defined");
        return Ok(HashMap::new());
    }

    let year_col = freezeup.column(FREEZEUP_YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let doy_col = freezeup.column(source)?.cast(&DataType::Float64)?;

    let mut dates = HashMap::new();
    for (year, doy) in year_col.i32()?.into_iter().zip(doy_col.f64()?.into_iter()) {
        let Some(year) = year else { continue };
        if years.is_some_and(|requested| !requested.contains(&year)) {
            continue;
        }
        let Some(doy) = doy else {
            warn!("No freeze-up day recorded for {year} in source '{source}'");
            continue;
        };
        // Freeze-up occurs in the autumn before the label year.
        match NaiveDate::from_yo_opt(year - 1, doy as u32) {
            Some(date) => {
                dates.insert(year, date);
            }
            None => warn!("Invalid freeze-up day-of-year {doy} for {year}"),
        }
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_freezeup(dir: &TempDir) -> PathBuf {
        let mut content = String::new();
        for i in 0..FREEZEUP_HEADER_LINES {
            content.push_str(&format!("# header line {i}\n"));
        }
        content.push_str("year\the\tjl\n");
        content.push_str("2010\t310\t-\n");
        content.push_str("2011\t-\t45\n");
        content.push_str("2012\t300\t290\n");

        let path = dir.path().join("freezeup_dates.txt");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reconciliation_prefers_primary_source() {
        let dir = TempDir::new().unwrap();
        let df = load_freezeup(&write_freezeup(&dir)).unwrap();

        let all = df
            .column(FREEZEUP_SOURCE_ALL)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap();
        let all = all.f64().unwrap();
        assert_eq!(all.get(0), Some(310.0)); // he present
        assert_eq!(all.get(1), Some(45.0)); // he missing, jl fills in
        assert_eq!(all.get(2), Some(300.0)); // both present, he wins
    }

    #[test]
    fn test_dates_built_from_previous_year() {
        let dir = TempDir::new().unwrap();
        let df = load_freezeup(&write_freezeup(&dir)).unwrap();

        let dates = freezeup_date_of_year(&df, None, FREEZEUP_SOURCE_ALL).unwrap();
        assert_eq!(dates.len(), 3);
        // Label year 2011: DOY 45 of 2010.
        assert_eq!(dates[&2011], NaiveDate::from_yo_opt(2010, 45).unwrap());
        assert_eq!(dates[&2010], NaiveDate::from_yo_opt(2009, 310).unwrap());
    }

    #[test]
    fn test_year_selection() {
        let dir = TempDir::new().unwrap();
        let df = load_freezeup(&write_freezeup(&dir)).unwrap();

        let dates = freezeup_date_of_year(&df, Some(&[2012]), FREEZEUP_SOURCE_ALL).unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[&2012], NaiveDate::from_yo_opt(2011, 300).unwrap());
    }

    #[test]
    fn test_unknown_source_fails_softly() {
        let dir = TempDir::new().unwrap();
        let df = load_freezeup(&write_freezeup(&dir)).unwrap();

        let dates = freezeup_date_of_year(&df, None, "nobody").unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let mut content = String::new();
        for _ in 0..FREEZEUP_HEADER_LINES {
            content.push_str("#\n");
        }
        content.push_str("year\the\n2010\t310\n");
        let path = dir.path().join("freezeup_dates.txt");
        fs::write(&path, content).unwrap();

        let err = load_freezeup(&path).unwrap_err();
        assert!(matches!(err, MbsError::MissingColumn { .. }));
    }
}
