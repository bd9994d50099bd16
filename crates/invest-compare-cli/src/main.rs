mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;
use std::process;

use commands::compare::CompareArgs;
use commands::equity::{EquityArgs, LocalArgs};
use commands::property::PropertyArgs;
use commands::rates::RateYearsArgs;

/// Compare a property purchase with an index-fund holding
#[derive(Parser)]
#[command(
    name = "ivc",
    version,
    about = "Compare a property purchase with an index-fund holding",
    long_about = "Answers whether buying a property in a local currency beat buying an \
                  S&P 500-style index with the same money. Uses yearly index levels, \
                  dividend yields and CPI plus historical exchange rates, with decimal \
                  precision throughout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a USD index holding over a period
    Equity(EquityArgs),
    /// Value a local-currency investment routed through the USD index
    Local(LocalArgs),
    /// Annualised appreciation and rental return of a property
    Property(PropertyArgs),
    /// Full property versus index comparison
    Compare(CompareArgs),
    /// Show the years a currency can be compared over
    RateYears(RateYearsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Equity(args) => commands::equity::run_equity(args),
        Commands::Local(args) => commands::equity::run_local(args),
        Commands::Property(args) => commands::property::run_property(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::RateYears(args) => commands::rates::run_rate_years(args),
        Commands::Version => {
            println!("ivc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            debug!("rendering output as {:?}", cli.output);
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
