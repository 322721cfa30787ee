//! Per-year instrument schema rules.
//!
//! The thermistor string was redeployed most springs with different geometry:
//! sensor offsets, string length, and datalogger header quirks all changed
//! over the years. The rules are a closed, empirically calibrated lookup
//! table taken from the deployment logs, represented as an ordered list of
//! year-range rows evaluated top-down. The groupings are intentional
//! (2006 shares the 2008-2009 geometry, 2012 reverted to the -40 cm offset)
//! and must not be generalized into a formula.

use crate::error::{MbsError, Result};
use crate::models::YearConfig;
use std::path::Path;

/// One row of the year-band rule table: an inclusive year range and the
/// instrument configuration that applies to it.
#[derive(Debug, Clone, Copy)]
pub struct YearBand {
    pub years: (i32, i32),
    pub config: YearConfig,
}

/// Year-band rule table, evaluated top-down. Offsets are centimeters from
/// the ice/snow interface, positive downward.
pub const YEAR_BANDS: &[YearBand] = &[
    YearBand {
        years: (2007, 2007),
        config: YearConfig {
            sensor0_offset_cm: 5,
            thermistor_count: 29,
            drop_rows: 0,
        },
    },
    YearBand {
        // 2006 used the same string as 2008-2009, 40 cm above the interface.
        years: (2006, 2006),
        config: YearConfig {
            sensor0_offset_cm: -40,
            thermistor_count: 29,
            drop_rows: 0,
        },
    },
    YearBand {
        years: (2008, 2009),
        config: YearConfig {
            sensor0_offset_cm: -40,
            thermistor_count: 29,
            drop_rows: 0,
        },
    },
    YearBand {
        // Bad data on the first entry row.
        years: (2010, 2010),
        config: YearConfig {
            sensor0_offset_cm: -70,
            thermistor_count: 30,
            drop_rows: 1,
        },
    },
    YearBand {
        // Bad first row plus a secondary header line.
        years: (2011, 2011),
        config: YearConfig {
            sensor0_offset_cm: -70,
            thermistor_count: 30,
            drop_rows: 2,
        },
    },
    YearBand {
        // String was re-rigged 40 cm above the interface for this season only.
        years: (2012, 2012),
        config: YearConfig {
            sensor0_offset_cm: -40,
            thermistor_count: 30,
            drop_rows: 1,
        },
    },
    YearBand {
        years: (2013, 2013),
        config: YearConfig {
            sensor0_offset_cm: -70,
            thermistor_count: 30,
            drop_rows: 1,
        },
    },
    YearBand {
        years: (2014, i32::MAX),
        config: YearConfig {
            sensor0_offset_cm: -70,
            thermistor_count: 30,
            drop_rows: 0,
        },
    },
];

/// Look up the instrument configuration for a deployment year.
/// Years before 2006 predate the record and have no defined configuration.
pub fn year_config(year: i32) -> Option<YearConfig> {
    YEAR_BANDS
        .iter()
        .find(|band| band.years.0 <= year && year <= band.years.1)
        .map(|band| band.config)
}

/// Extract the deployment year from a raw file path.
///
/// The year is the last underscore-delimited token of the file stem
/// (e.g. `BRW_mbs_2011.csv` -> 2011).
pub fn year_from_filename(path: &Path) -> Result<i32> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| MbsError::YearToken {
            path: path.to_path_buf(),
            reason: "file has no stem".to_string(),
        })?;

    let token = stem.rsplit('_').next().unwrap_or(stem);
    token.parse::<i32>().map_err(|_| MbsError::YearToken {
        path: path.to_path_buf(),
        reason: format!("token '{token}' is not a year"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_band_table_matches_deployment_log() {
        let cases = [
            (2007, 5, 29, 0),
            (2006, -40, 29, 0),
            (2008, -40, 29, 0),
            (2009, -40, 29, 0),
            (2010, -70, 30, 1),
            (2011, -70, 30, 2),
            (2012, -40, 30, 1),
            (2013, -70, 30, 1),
            (2014, -70, 30, 0),
            (2016, -70, 30, 0),
        ];
        for (year, offset, count, dropped) in cases {
            let cfg = year_config(year).unwrap();
            assert_eq!(cfg.sensor0_offset_cm, offset, "offset for {year}");
            assert_eq!(cfg.thermistor_count, count, "count for {year}");
            assert_eq!(cfg.drop_rows, dropped, "drop_rows for {year}");
        }
    }

    #[test]
    fn test_years_before_record_are_rejected() {
        assert!(year_config(2005).is_none());
        assert!(year_config(1998).is_none());
    }

    #[test]
    fn test_year_from_filename() {
        let year = year_from_filename(&PathBuf::from("/data/mbs/BRW_mbs_2011.csv")).unwrap();
        assert_eq!(year, 2011);

        let year = year_from_filename(&PathBuf::from("mass_balance_2007.csv")).unwrap();
        assert_eq!(year, 2007);
    }

    #[test]
    fn test_year_from_filename_rejects_non_numeric() {
        let err = year_from_filename(&PathBuf::from("BRW_mbs_final.csv")).unwrap_err();
        assert!(matches!(err, MbsError::YearToken { .. }));
    }
}
