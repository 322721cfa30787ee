//! Batch processing engine.
//!
//! Orchestrates the one-shot pipeline: enumerate raw site-year files,
//! normalize each with the per-year schema rules, diagonally concatenate
//! the results into one multi-year table (years contribute differing depth
//! columns), sort by timestamp, and write the Parquet output.

use crate::config::ProcessingOptions;
use crate::constants::{DATETIME_COLUMN, DEFAULT_OUTPUT_FILE};
use crate::discovery::list_data_files;
use crate::error::{MbsError, Result};
use crate::models::ProcessingStats;
use crate::reader::read_mbs_file;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Processor for one mass-balance dataset directory.
#[derive(Debug)]
pub struct DatasetProcessor {
    dataset_path: PathBuf,
    output_path: PathBuf,
    options: ProcessingOptions,
}

impl DatasetProcessor {
    /// Create a new dataset processor. The output path defaults to a file
    /// inside the dataset directory.
    pub fn new(dataset_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        let output_path =
            output_path.unwrap_or_else(|| dataset_path.join(DEFAULT_OUTPUT_FILE));

        if !dataset_path.exists() {
            return Err(MbsError::DatasetNotFound { path: dataset_path });
        }

        Ok(Self {
            dataset_path,
            output_path,
            options: ProcessingOptions::default(),
        })
    }

    /// Configure the processor.
    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Main processing entry point.
    ///
    /// A format error in any discovered file (bad year token, malformed
    /// timestamp) aborts the run with the offending path; data-quality
    /// conditions inside the files never do.
    pub fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!(
            "{}",
            "Starting mass-balance dataset processing"
                .bright_green()
                .bold()
        );
        println!(
            "  {} {}",
            "Dataset:".bright_cyan(),
            self.dataset_path.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.output_path.display()
        );

        println!("\n{}", "Discovering raw files...".bright_yellow());
        let mut files: Vec<PathBuf> = list_data_files(
            &self.dataset_path,
            &self.options.file_extension,
            self.options.search_depth,
        )?
        .into_iter()
        .collect();
        files.sort();
        println!(
            "  {} {} raw file(s)",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        if files.is_empty() {
            return Ok(ProcessingStats {
                files_processed: 0,
                total_rows: 0,
                output_path: self.output_path.clone(),
                processing_time_ms: start_time.elapsed().as_millis(),
            });
        }

        println!("\n{}", "Normalizing files...".bright_yellow());
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut frames = Vec::with_capacity(files.len());
        for path in &files {
            if let Some(file_name) = path.file_name() {
                pb.set_message(format!("Importing: {}", file_name.to_string_lossy()));
            }
            info!("Import data from {}", path.display());
            let df = read_mbs_file(path)?;
            debug!("Normalized {}: {} rows", path.display(), df.height());
            frames.push(df.lazy());
            pb.inc(1);
        }
        pb.finish_with_message("All raw files normalized");

        // Years contribute different depth columns; the diagonal concat
        // fills the union schema with missing values, so equal depth labels
        // stay directly comparable across years.
        let combined = concat_lf_diagonal(frames, UnionArgs::default())?
            .sort([DATETIME_COLUMN], SortMultipleOptions::default());
        let mut table = combined.collect()?;
        let total_rows = table.height();

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&self.output_path)?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .with_statistics(StatisticsOptions::full())
            .finish(&mut table)?;

        let processing_time_ms = start_time.elapsed().as_millis();
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            files.len().to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Total rows:".bright_cyan(),
            total_rows.to_string().bright_white().bold()
        );

        Ok(ProcessingStats {
            files_processed: files.len(),
            total_rows,
            output_path: self.output_path.clone(),
            processing_time_ms,
        })
    }
}
