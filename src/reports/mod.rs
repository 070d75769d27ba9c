//! Report generation for comparison runs.
//!
//! A run is first projected into a format-neutral [`ReportModel`]; the
//! writers in this module only render it:
//! - Summary: colored terminal overview
//! - JSON: run, statistics and report tables for programmatic use
//! - Markdown: human-readable documentation
//! - CSV: one `# <table>` section per report table, or one file per table
//!
//! # Security
//!
//! Cell values come from user spreadsheets. The `escape` module must be used
//! before embedding them in Markdown output or file names.

mod csv;
pub mod escape;
mod json;
mod markdown;
pub mod model;
mod summary;
mod types;

pub use self::csv::{write_csv_tables, CsvReporter};
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use model::{project, project_with, ProjectionOptions, ReportModel, ReportTable};
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::diff::ComparisonRun;
use crate::error::{ReportErrorKind, SheetDiffError};
use crate::stats::RunStats;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<ReportError> for SheetDiffError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::IoError(e) => Self::from(e),
            ReportError::SerializationError(msg) => Self::report(
                "rendering report",
                ReportErrorKind::JsonSerializationError(msg),
            ),
            ReportError::CsvError(e) => Self::report(
                "rendering report",
                ReportErrorKind::CsvSerializationError(e.to_string()),
            ),
            ReportError::ConfigError(msg) => Self::config(msg),
            ReportError::FormatError(e) => Self::report(
                "rendering report",
                ReportErrorKind::UnsupportedFormat(e.to_string()),
            ),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for a comparison run
    fn generate_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_run_report(run, stats, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Project a run with the projection options carried by `config`.
#[must_use]
pub fn model_for(run: &ComparisonRun, stats: &RunStats, config: &ReportConfig) -> ReportModel {
    project_with(
        run,
        stats,
        ProjectionOptions {
            include_identical: config.include_identical,
        },
    )
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_formats() {
        for format in [
            ReportFormat::Summary,
            ReportFormat::Json,
            ReportFormat::Markdown,
            ReportFormat::Csv,
        ] {
            assert_eq!(create_reporter(format).format(), format);
        }
    }

    #[test]
    fn test_report_error_conversion() {
        let err: SheetDiffError = ReportError::SerializationError("bad".to_string()).into();
        assert!(matches!(err, SheetDiffError::Report { .. }));
        let err: SheetDiffError = ReportError::ConfigError("limit".to_string()).into();
        assert!(matches!(err, SheetDiffError::Config(_)));
    }
}
