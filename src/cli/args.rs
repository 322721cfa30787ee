//! Command-line argument definitions for the MBS processor.
//!
//! Defines the CLI interface using the clap derive API.

use crate::constants::{DEFAULT_LOCATION, DEFAULT_SEARCH_DEPTH, FREEZEUP_SOURCE_ALL};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the SIZONet mass-balance processor.
///
/// Normalizes per-year ice mass-balance buoy CSV files into one
/// depth-labeled Parquet table for downstream sea-ice analysis.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mbs-processor",
    version,
    about = "Normalize SIZONet ice mass-balance buoy data from per-year CSV to Parquet"
)]
pub struct Args {
    /// Raise log verbosity to DEBUG
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Normalize raw buoy files and write the combined Parquet table
    Process(ProcessArgs),
    /// Extract one day's vertical temperature profile from a processed table
    Profile(ProfileArgs),
    /// Print reconciled freeze-up dates from the observation file
    Freezeup(FreezeupArgs),
}

/// Arguments for the process command (main batch pipeline).
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Site configuration file (TOML with [site] and [mbs] sections).
    /// Resolves the dataset directory and output path.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dataset directory holding the raw per-year CSV files.
    /// Overrides the configuration file when both are given.
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub input_path: Option<PathBuf>,

    /// Output path for the normalized Parquet table
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Directory recursion depth (0 = dataset directory only)
    #[arg(long = "depth", value_name = "N", default_value_t = DEFAULT_SEARCH_DEPTH)]
    pub depth: usize,
}

/// Arguments for the profile command.
#[derive(Debug, Clone, Parser)]
pub struct ProfileArgs {
    /// Normalized Parquet table written by the process command
    #[arg(long = "data", value_name = "FILE")]
    pub data_path: PathBuf,

    /// Target day, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`. A non-midnight hour
    /// averages that hour only; midnight uses the daytime window.
    #[arg(long = "date", value_name = "DATE")]
    pub date: String,

    /// Site label attached to the profile
    #[arg(long = "location", value_name = "LABEL", default_value = DEFAULT_LOCATION)]
    pub location: String,

    /// Ice thickness in meters, used when the buoy recorded none
    #[arg(long = "thickness", value_name = "METERS")]
    pub thickness: Option<f64>,

    /// Trim the profile to the ice column and anchor it to the ice bottom
    #[arg(long = "bounded")]
    pub bounded: bool,
}

/// Arguments for the freezeup command.
#[derive(Debug, Clone, Parser)]
pub struct FreezeupArgs {
    /// Freeze-up observation file (tab-separated)
    #[arg(long = "path", value_name = "FILE")]
    pub path: PathBuf,

    /// Label year(s) to look up; all years when omitted
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    /// Source column to read (`he`, `jl`, or the reconciled `all`)
    #[arg(long = "source", value_name = "COL", default_value = FREEZEUP_SOURCE_ALL)]
    pub source: String,
}
