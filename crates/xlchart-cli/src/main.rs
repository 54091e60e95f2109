//! xlchart CLI - chart spreadsheet observations by category

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod logging;

use crate::cli::Cli;
use crate::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let config = cli.to_config();
    match xlchart::run(&config) {
        Ok(summary) => {
            print_summary(&config, &summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = err.exit_code(), "{err}");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn print_summary(config: &xlchart::Config, summary: &xlchart::RunSummary) {
    println!(
        "{} categories, {} observations from '{}'",
        summary.categories, summary.observations, config.source_sheet
    );
    match &summary.output {
        Some(path) => println!(
            "Wrote sheet '{}' ({} columns, {} series) to {}",
            config.destination_sheet,
            summary.columns,
            summary.series,
            path.display()
        ),
        None => println!(
            "Dry run: sheet '{}' would get {} columns and {} series",
            config.destination_sheet, summary.columns, summary.series
        ),
    }
    if !summary.axis_mismatches.is_empty() {
        println!(
            "Plotted against the x-values of the first category: {}",
            summary.axis_mismatches.join(", ")
        );
    }
}
