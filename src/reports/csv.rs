//! CSV report generator.
//!
//! Generates comma-separated reports suitable for spreadsheet import and
//! data analysis pipelines. The streamed form holds every report table as a
//! `# <table>` section; [`write_csv_tables`] writes one file per table instead.

use super::escape::file_stem_for;
use super::{model_for, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use super::model::{ReportModel, ReportTable};
use crate::diff::ComparisonRun;
use crate::error::{ReportErrorKind, Result, SheetDiffError};
use crate::stats::RunStats;
use ::csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write one table as RFC 4180 CSV, header first.
fn write_table<W: Write>(table: &ReportTable, writer: W) -> std::result::Result<(), ReportError> {
    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);
    out.write_record(&table.columns)?;
    for row in &table.rows {
        out.write_record(row.iter().map(|v| v.canonical_string()))?;
    }
    out.flush()?;
    Ok(())
}

impl ReportGenerator for CsvReporter {
    fn generate_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
    ) -> std::result::Result<String, ReportError> {
        let model = model_for(run, stats, config);
        let mut content = Vec::new();

        for (i, table) in model.tables.iter().enumerate() {
            if i > 0 {
                content.push(b'\n');
            }
            writeln!(content, "# {}", table.name)?;
            write_table(table, &mut content)?;
        }

        String::from_utf8(content).map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Write every table of `model` to `<dir>/<table>.csv`.
///
/// The directory is created when missing. Returns the written paths in table
/// order.
pub fn write_csv_tables(model: &ReportModel, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| SheetDiffError::io(dir, e))?;

    let mut written = Vec::with_capacity(model.tables.len());
    for table in &model.tables {
        let path = dir.join(format!("{}.csv", file_stem_for(&table.name)));
        let file = std::fs::File::create(&path).map_err(|e| SheetDiffError::io(&path, e))?;
        write_table(table, std::io::BufWriter::new(file)).map_err(|e| {
            SheetDiffError::report(
                format!("writing {}", path.display()),
                ReportErrorKind::CsvSerializationError(e.to_string()),
            )
        })?;
        tracing::debug!(table = %table.name, path = %path.display(), "Wrote report table");
        written.push(path);
    }
    Ok(written)
}
