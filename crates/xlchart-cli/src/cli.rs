//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use xlchart_core::config::{
    DEFAULT_CATEGORY_COLUMN, DEFAULT_DESTINATION_SHEET, DEFAULT_FILE, DEFAULT_SOURCE_SHEET,
    DEFAULT_X_COLUMN, DEFAULT_Y_COLUMN,
};
use xlchart::{ColumnNames, Config};

use crate::logging::{LogConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "xlchart")]
#[command(
    author,
    version,
    about = "Group spreadsheet observations by category and chart them in a new sheet",
    long_about = "Reads a table from a worksheet, groups its x/y values by a category column, \
                  and writes one x column, one y column per category and a smoothed line \
                  chart into a new sheet of the same workbook."
)]
pub struct Cli {
    /// Workbook to read (and overwrite unless --output is given)
    #[arg(long, alias = "fileName", value_name = "PATH", default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Sheet holding the source table
    #[arg(long, alias = "sheetName", value_name = "NAME", default_value = DEFAULT_SOURCE_SHEET)]
    pub sheet: String,

    /// Sheet to create for the reshaped table and chart
    #[arg(long, alias = "newSheetName", value_name = "NAME", default_value = DEFAULT_DESTINATION_SHEET)]
    pub new_sheet: String,

    /// Header of the column holding the category label
    #[arg(long, alias = "categoryColName", value_name = "HEADER", default_value = DEFAULT_CATEGORY_COLUMN)]
    pub category_column: String,

    /// Header of the column holding x-axis values
    #[arg(long, alias = "xColName", value_name = "HEADER", default_value = DEFAULT_X_COLUMN)]
    pub x_column: String,

    /// Header of the column holding y-axis values
    #[arg(long, alias = "yColName", value_name = "HEADER", default_value = DEFAULT_Y_COLUMN)]
    pub y_column: String,

    /// Save to this path instead of overwriting the input workbook
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Top-left cell of the chart
    #[arg(long, value_name = "CELL", default_value = "E1", value_parser = parse_anchor)]
    pub chart_anchor: (u32, u32),

    /// Read and plan only; do not save
    #[arg(long)]
    pub dry_run: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,
}

/// Log output format choices
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Build the run configuration
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            input: self.file.clone(),
            output: self.output.clone(),
            source_sheet: self.sheet.clone(),
            destination_sheet: self.new_sheet.clone(),
            columns: ColumnNames::new(
                self.category_column.as_str(),
                self.x_column.as_str(),
                self.y_column.as_str(),
            ),
            dry_run: self.dry_run,
            ..Config::default()
        };
        config.chart.anchor = self.chart_anchor;
        config
    }

    /// Build the logging configuration
    pub fn log_config(&self) -> LogConfig {
        let level = if self.quiet {
            LevelFilter::ERROR
        } else {
            match self.verbose {
                0 => LevelFilter::WARN,
                1 => LevelFilter::INFO,
                2 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        };
        LogConfig {
            level,
            format: match self.log_format {
                LogFormatArg::Pretty => LogFormat::Pretty,
                LogFormatArg::Compact => LogFormat::Compact,
                LogFormatArg::Json => LogFormat::Json,
            },
        }
    }
}

fn parse_anchor(s: &str) -> Result<(u32, u32), String> {
    xlchart_core::parse_cell(s).map_err(|e| e.to_string())
}
