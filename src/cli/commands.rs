//! Subcommand dispatch.

use crate::cli::args::{Args, Commands, FreezeupArgs, ProcessArgs, ProfileArgs};
use crate::config::{ProcessingOptions, SiteConfig};
use crate::constants::DEFAULT_OUTPUT_FILE;
use crate::freezeup::{freezeup_date_of_year, load_freezeup};
use crate::processor::DatasetProcessor;
use crate::profile::{bounded_profile, full_profile, ProfileOptions};

use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime};
use colored::*;
use polars::prelude::*;
use std::fs::File;

pub fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Commands::Process(process_args)) => run_process(process_args),
        Some(Commands::Profile(profile_args)) => run_profile(profile_args),
        Some(Commands::Freezeup(freezeup_args)) => run_freezeup(freezeup_args),
        None => Ok(()),
    }
}

fn run_process(args: ProcessArgs) -> anyhow::Result<()> {
    let (input, output) = match (&args.config, &args.input_path) {
        (_, Some(input)) => (
            input.clone(),
            args.output_path
                .clone()
                .unwrap_or_else(|| input.join(DEFAULT_OUTPUT_FILE)),
        ),
        (Some(config_path), None) => {
            let config = SiteConfig::load(config_path)?;
            (
                config.mbs_dir(),
                args.output_path.clone().unwrap_or_else(|| config.output_path()),
            )
        }
        (None, None) => bail!("either --config or --input must be given"),
    };

    let processor = DatasetProcessor::new(input, Some(output))?
        .with_options(ProcessingOptions::default().with_search_depth(args.depth));
    processor.process().context("processing failed")?;
    Ok(())
}

fn run_profile(args: ProfileArgs) -> anyhow::Result<()> {
    let file = File::open(&args.data_path)
        .with_context(|| format!("cannot open {}", args.data_path.display()))?;
    let data = ParquetReader::new(file)
        .finish()
        .context("cannot read normalized table")?;

    let day = parse_day(&args.date)?;
    let options = ProfileOptions {
        location: args.location.clone(),
        ice_thickness: args.thickness,
    };
    let profile = if args.bounded {
        bounded_profile(&data, day, &options)?
    } else {
        full_profile(&data, day, &options)?
    };

    match profile {
        None => println!("No data for selected day {}", day.date()),
        Some(profile) => {
            println!(
                "{} {} ({})",
                "Profile".bright_green().bold(),
                profile.name,
                profile.location
            );
            println!(
                "  {} {:.2} m ({})",
                "Ice thickness:".bright_cyan(),
                profile.ice_thickness,
                profile.thickness_source.comment()
            );
            if let Some(snow) = profile.snow_depth {
                println!("  {} {:.1} cm", "Snow depth:".bright_cyan(), snow);
            }
            println!("{}", profile.to_dataframe()?);
        }
    }
    Ok(())
}

fn run_freezeup(args: FreezeupArgs) -> anyhow::Result<()> {
    let table = load_freezeup(&args.path)?;
    let years = if args.years.is_empty() {
        None
    } else {
        Some(args.years.as_slice())
    };

    let dates = freezeup_date_of_year(&table, years, &args.source)?;
    let mut dates: Vec<_> = dates.into_iter().collect();
    dates.sort();
    for (year, date) in dates {
        println!("{year}: {date}");
    }
    Ok(())
}

/// Parse a day argument, with or without an hour component.
fn parse_day(value: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("wrong format for day '{value}', expected YYYY-MM-DD"))?;
    Ok(date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
}
