//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so stdout stays free for the run summary.
//!
//! # Log Levels
//!
//! - `error`: the failure that ended the run
//! - `warn`: categories plotted against x-values that are not their own
//! - `info`: stage progress and counts
//! - `debug`: resolved columns, sheet copies, chart placement
//! - `trace`: per-column writes

use std::io::{self, IsTerminal};

use anyhow::{anyhow, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events follow the configured level; everything else stays at warn
const CRATES: &[&str] = &[
    "xlchart",
    "xlchart_cli",
    "xlchart_core",
    "xlchart_chart",
    "xlchart_xlsx",
];

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored when stderr is a terminal.
    #[default]
    Pretty,
    /// Single-line records.
    Compact,
    /// One JSON object per record.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::default(),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG`, when set, replaces the filter built from `config.level`.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = build_env_filter(config.level);
    let ansi = io::stderr().is_terminal();
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_ansi(ansi)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };
    result.map_err(|err| anyhow!(err))
}

fn build_env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}
