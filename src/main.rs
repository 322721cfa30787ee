use clap::Parser;
use mbs_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // If no subcommand was provided, show the available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("MBS Processor - SIZONet Ice Mass-Balance Data Converter");
    println!("=======================================================");
    println!();
    println!("Normalize per-year ice mass-balance buoy CSV files into one");
    println!("depth-labeled Parquet table, and extract day temperature profiles.");
    println!();
    println!("USAGE:");
    println!("    mbs-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Normalize raw buoy files and write the Parquet table");
    println!("    profile     Extract one day's vertical temperature profile");
    println!("    freezeup    Print reconciled freeze-up dates");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a dataset directory:");
    println!("    mbs-processor process --input /data/SIZONet/mbs");
    println!();
    println!("    # Process using a site configuration file:");
    println!("    mbs-processor process --config BRW.toml");
    println!();
    println!("    # Extract a bounded profile for one day:");
    println!("    mbs-processor profile --data mbs_data.parquet --date 2011-03-10 --bounded");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mbs-processor <COMMAND> --help");
}
