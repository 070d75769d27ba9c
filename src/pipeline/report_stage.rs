//! Report output stage.
//!
//! Renders the run in the configured format, writes it to stdout or a file
//! and optionally writes one CSV file per report table.

use crate::config::DiffConfig;
use crate::diff::ComparisonRun;
use crate::reports::{create_reporter_with_options, model_for, write_csv_tables};
use crate::stats::RunStats;
use anyhow::{Context, Result};

use super::{should_use_color, write_output, OutputTarget, PipelineError};

/// Render and write the report for `run`, returning the run statistics.
pub fn output_report(config: &DiffConfig, run: &ComparisonRun) -> Result<RunStats> {
    let stats = RunStats::from_run(run);
    let report_config = config.report_config();
    let target = OutputTarget::from_option(config.output.file.clone());

    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter_with_options(config.output.format, use_color);
    let report = reporter
        .generate_run_report(run, &stats, &report_config)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;

    write_output(&report, &target, config.behavior.quiet)?;

    if let Some(dir) = &config.output.directory {
        let model = model_for(run, &stats, &report_config);
        let written = write_csv_tables(&model, dir)
            .with_context(|| format!("Failed to write report tables to {}", dir.display()))?;
        if !config.behavior.quiet {
            tracing::info!("Wrote {} table(s) to {}", written.len(), dir.display());
        }
    }

    Ok(stats)
}
