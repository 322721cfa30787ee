//! End-to-end pipeline tests over a synthetic multi-year dataset.

use mbs_processor::profile::{bounded_profile, full_profile, ProfileOptions};
use mbs_processor::{DatasetProcessor, MbsError, ThicknessSource};

use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a dataset directory with one file per year band.
fn create_dataset(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let dataset_path = temp_dir.path().join("mbs");
    fs::create_dir_all(&dataset_path).unwrap();

    // 2007: sensor 0 at +5 cm, no dropped rows.
    fs::write(
        dataset_path.join("BRW_mbs_2007.csv"),
        "Year,DOY,UTC time (hhmm),T1,T2,Hs (#0-Mast),Hi\n\
         2007,40,1200,-8.0,-6.0,10,1.1\n\
         2007,40,1400,-8.2,-6.1,10,1.1\n",
    )
    .unwrap();

    // 2009: sensor 0 at -40 cm.
    fs::write(
        dataset_path.join("BRW_mbs_2009.csv"),
        "Year,DOY,UTC time (hhmm),T1,T2,Hs (#0-Mast),Hi\n\
         2009,32,600,-12.0,-10.0,25,1.2\n",
    )
    .unwrap();

    let output_path = temp_dir.path().join("output").join("mbs_data.parquet");
    (dataset_path, output_path)
}

fn read_output(path: &PathBuf) -> DataFrame {
    ParquetReader::new(fs::File::open(path).unwrap())
        .finish()
        .unwrap()
}

#[test]
fn test_multi_band_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset_path, output_path) = create_dataset(&temp_dir);

    let processor = DatasetProcessor::new(dataset_path, Some(output_path.clone())).unwrap();
    let stats = processor.process().unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.output_path, output_path);
    assert!(output_path.exists());

    // The concatenated table carries the union of both bands' depth columns.
    let table = read_output(&output_path);
    for label in ["5", "15", "-40", "-30"] {
        assert!(table.column(label).is_ok(), "missing depth column {label}");
    }
    assert!(table.column("datetime").is_ok());
    assert!(table.column("Hs").is_ok());
}

#[test]
fn test_profile_extraction_from_processed_table() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset_path, output_path) = create_dataset(&temp_dir);

    DatasetProcessor::new(dataset_path, Some(output_path.clone()))
        .unwrap()
        .process()
        .unwrap();
    let table = read_output(&output_path);

    // DOY 32 of 2009 is February 1st; the 06:00 row sits in the daytime
    // window used by a midnight request.
    let day = NaiveDate::from_ymd_opt(2009, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let profile = full_profile(&table, day, &ProfileOptions::default())
        .unwrap()
        .unwrap();

    assert_eq!(profile.name, "mbs-20090201");
    assert_eq!(profile.thickness_source, ThicknessSource::Measured);
    assert!((profile.ice_thickness - 1.2).abs() < 1e-9);
    assert_eq!(profile.snow_depth, Some(25.0));

    // 2007 depth columns are all-missing for this day and drop out.
    assert_eq!(profile.samples.len(), 2);
    assert!((profile.samples[0].depth_m - -0.4).abs() < 1e-9);
    assert!((profile.samples[0].temperature_c - -12.0).abs() < 1e-9);
}

#[test]
fn test_bounded_profile_from_processed_table() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset_path, output_path) = create_dataset(&temp_dir);

    DatasetProcessor::new(dataset_path, Some(output_path.clone()))
        .unwrap()
        .process()
        .unwrap();
    let table = read_output(&output_path);

    let day = NaiveDate::from_ymd_opt(2007, 2, 9)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let profile = bounded_profile(&table, day, &ProfileOptions::default())
        .unwrap()
        .unwrap();

    // Both samples sit above the measured ice bottom; the deepest retained
    // one is pinned to the thickness value.
    assert_eq!(profile.samples.last().unwrap().depth_m, 1.1);
}

#[test]
fn test_empty_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let dataset_path = temp_dir.path().join("empty");
    fs::create_dir_all(&dataset_path).unwrap();
    let output_path = temp_dir.path().join("output").join("mbs_data.parquet");

    let processor = DatasetProcessor::new(dataset_path, Some(output_path.clone())).unwrap();
    let stats = processor.process().unwrap();

    assert_eq!(stats.files_processed, 0);
    assert_eq!(stats.total_rows, 0);
    assert!(!output_path.exists());
}

#[test]
fn test_malformed_year_token_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let (dataset_path, output_path) = create_dataset(&temp_dir);
    fs::write(
        dataset_path.join("BRW_mbs_final.csv"),
        "Year,DOY,UTC time (hhmm),T1\n2009,32,600,-12.0\n",
    )
    .unwrap();

    let processor = DatasetProcessor::new(dataset_path, Some(output_path)).unwrap();
    let err = processor.process().unwrap_err();
    assert!(matches!(err, MbsError::YearToken { .. }));
}

#[test]
fn test_missing_dataset_directory() {
    let temp_dir = TempDir::new().unwrap();
    let err = DatasetProcessor::new(temp_dir.path().join("nope"), None).unwrap_err();
    assert!(matches!(err, MbsError::DatasetNotFound { .. }));
}
