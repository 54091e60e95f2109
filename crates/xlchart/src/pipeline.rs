//! The end-to-end transform
//!
//! open workbook -> read source rows -> resolve columns -> aggregate ->
//! plan output sheet -> add the new sheet to the package -> save
//!
//! Nothing is written until every earlier stage has succeeded, so a failed
//! run leaves the input file untouched.

use std::path::PathBuf;

use tracing::{debug, info, info_span, warn};
use xlchart_chart::{plan_sheet, SheetLayout};
use xlchart_core::{aggregate_from, resolve_columns, CategoryTable, Config};
use xlchart_xlsx::{OutputWorkbook, SheetRows, SourceWorkbook};

use crate::error::{Error, Result};

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Distinct categories found
    pub categories: usize,
    /// Data rows aggregated
    pub observations: usize,
    /// Columns written to the output sheet, including the x column
    pub columns: usize,
    /// Chart series added
    pub series: usize,
    /// Categories whose x-values differ from the shared x column
    pub axis_mismatches: Vec<String>,
    /// Where the workbook was saved; `None` for a dry run
    pub output: Option<PathBuf>,
}

/// The aggregated table and the output sheet planned from it
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub table: CategoryTable,
    pub layout: SheetLayout,
}

impl Plan {
    fn summary(&self, output: Option<PathBuf>) -> RunSummary {
        RunSummary {
            categories: self.table.len(),
            observations: self.table.observation_count(),
            columns: self.layout.columns.len(),
            series: self
                .layout
                .chart
                .as_ref()
                .map_or(0, |chart| chart.series.len()),
            axis_mismatches: self
                .table
                .axis_mismatches()
                .into_iter()
                .map(str::to_string)
                .collect(),
            output,
        }
    }
}

/// Resolve, aggregate and lay out already-read source rows
pub fn plan(rows: &SheetRows, config: &Config) -> Result<Plan> {
    let header = rows.header().unwrap_or_default();
    let indices = resolve_columns(header, &config.columns)?;
    debug!(?indices, "resolved columns");

    let table = aggregate_from(
        rows.data(),
        &indices,
        rows.first_data_row(),
        rows.first_column,
    )?;
    if table.is_empty() {
        return Err(Error::NoData(config.source_sheet.clone()));
    }
    info!(
        categories = table.len(),
        observations = table.observation_count(),
        "aggregated observations"
    );

    for category in table.axis_mismatches() {
        warn!(
            category,
            "x-values differ from the shared x column; series is plotted against the first category's x-values"
        );
    }

    let layout = plan_sheet(
        &config.destination_sheet,
        &config.columns.x,
        &table,
        &config.chart,
    )?;
    Ok(Plan { table, layout })
}

/// Run the transform described by `config`
pub fn run(config: &Config) -> Result<RunSummary> {
    let span = info_span!("run", input = %config.input.display());
    let _guard = span.enter();

    let mut output = OutputWorkbook::open(&config.input)?;
    output.check_new_sheet(&config.destination_sheet)?;

    let mut source = SourceWorkbook::open(&config.input)?;
    let rows = source.rows(&config.source_sheet)?;
    drop(source);
    info!(
        sheet = %config.source_sheet,
        rows = rows.data().len(),
        "read source sheet"
    );

    let plan = plan(&rows, config)?;

    if config.dry_run {
        info!("dry run, workbook not saved");
        return Ok(plan.summary(None));
    }

    output.write_layout(&plan.layout)?;

    let path = config.output_path();
    output.save(path)?;
    Ok(plan.summary(Some(path.to_path_buf())))
}
