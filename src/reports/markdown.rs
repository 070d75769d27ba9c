//! Markdown report generator.

use super::escape::{escape_markdown_inline, escape_markdown_table};
use super::model::{ReportTable, IDENTIFIER_TABLE, MODIFICATIONS_TABLE, ONLY_A_TABLE, ONLY_B_TABLE, SUMMARY_TABLE};
use super::{model_for, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::ComparisonRun;
use crate::stats::RunStats;
use std::fmt::Write;

/// Markdown report generator
pub struct MarkdownReporter {
    /// Rows rendered per table before eliding the rest
    max_rows: usize,
}

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { max_rows: 200 }
    }

    /// Limit the rows rendered per table
    #[must_use]
    pub const fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    fn write_table(&self, md: &mut String, table: &ReportTable) -> std::fmt::Result {
        if table.is_empty() {
            writeln!(md, "_No rows._\n")?;
            return Ok(());
        }

        let header = table
            .columns
            .iter()
            .map(|c| escape_markdown_table(c))
            .collect::<Vec<_>>();
        writeln!(md, "| {} |", header.join(" | "))?;
        writeln!(md, "|{}", "---|".repeat(header.len()))?;

        for row in table.rows.iter().take(self.max_rows) {
            let cells = row
                .iter()
                .map(|v| escape_markdown_table(&v.canonical_string()))
                .collect::<Vec<_>>();
            writeln!(md, "| {} |", cells.join(" | "))?;
        }
        if table.len() > self.max_rows {
            writeln!(
                md,
                "\n_{} more row(s) omitted._",
                table.len() - self.max_rows
            )?;
        }
        writeln!(md)?;
        Ok(())
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let model = model_for(run, stats, config);
        let mut md = String::new();

        let title = config.title.as_deref().unwrap_or("Sheet Diff Report");
        writeln!(md, "# {}\n", escape_markdown_inline(title))?;
        writeln!(
            md,
            "**Datasets:** {} → {}  ",
            escape_markdown_inline(&run.label_a),
            escape_markdown_inline(&run.label_b)
        )?;
        writeln!(
            md,
            "**Identifiers:** {}  ",
            escape_markdown_inline(&run.identifiers.columns().join(", "))
        )?;
        writeln!(
            md,
            "**Generated by:** sheet-diff v{}\n",
            config.metadata.tool_version
        )?;

        writeln!(md, "## Overview\n")?;
        writeln!(md, "| Metric | Value |")?;
        writeln!(md, "|---|---|")?;
        writeln!(md, "| Sheets compared | {} |", stats.sheets_compared)?;
        writeln!(md, "| Sheets with differences | {} |", stats.sheets_with_differences)?;
        writeln!(md, "| Sheets failed | {} |", stats.sheets_failed)?;
        writeln!(md, "| Identical rows | {} |", stats.identical)?;
        writeln!(md, "| Modified rows | {} |", stats.modified)?;
        writeln!(md, "| Only in A | {} |", stats.only_in_a)?;
        writeln!(md, "| Only in B | {} |", stats.only_in_b)?;
        writeln!(md, "| Match rate | {:.2}% |", stats.match_rate * 100.0)?;
        writeln!(md, "| Data coverage | {:.2}% |", stats.data_coverage * 100.0)?;
        writeln!(md)?;

        let verdict = if run.has_differences() {
            "Differences found"
        } else {
            "Datasets are identical"
        };
        writeln!(md, "> **Result:** {verdict}\n")?;

        for (heading, name) in [
            ("Sheet Summary", SUMMARY_TABLE),
            ("Modifications", MODIFICATIONS_TABLE),
            ("Identifier Analysis", IDENTIFIER_TABLE),
            ("Rows Only in A", ONLY_A_TABLE),
            ("Rows Only in B", ONLY_B_TABLE),
        ] {
            if let Some(table) = model.table(name) {
                writeln!(md, "## {heading}\n")?;
                self.write_table(&mut md, table)?;
            }
        }

        let details: Vec<_> = model
            .tables
            .iter()
            .filter(|t| t.name.starts_with(super::model::DETAILS_PREFIX))
            .collect();
        if !details.is_empty() {
            writeln!(md, "## Sheet Details\n")?;
            for table in details {
                writeln!(md, "### {}\n", escape_markdown_inline(&table.name))?;
                self.write_table(&mut md, table)?;
            }
        }

        Ok(md)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{CellValue, Dataset, Table};

    #[test]
    fn test_markdown_sections() {
        let mut a = Table::new(["Channel Name", "Value"]);
        a.push_values([CellValue::from("Zee|TV"), CellValue::from(10.0)]);
        let mut b = Table::new(["Channel Name", "Value"]);
        b.push_values([CellValue::from("Zee|TV"), CellValue::from(20.0)]);
        let run = DiffEngine::default()
            .compare_datasets(
                &Dataset::new("a").with_sheet("Jan", a),
                &Dataset::new("b").with_sheet("Jan", b),
            )
            .unwrap();
        let stats = RunStats::from_run(&run);

        let md = MarkdownReporter::new()
            .generate_run_report(&run, &stats, &ReportConfig::default())
            .unwrap();
        assert!(md.starts_with("# Sheet Diff Report\n"));
        assert!(md.contains("## Modifications"));
        assert!(md.contains("### Details\\_Jan"));
        assert!(md.contains("| Modified rows | 1 |"));
        assert!(md.contains("Zee\\|TV"));
        assert!(md.contains("> **Result:** Differences found"));
    }

    #[test]
    fn test_rows_are_elided() {
        let mut table = ReportTable::new("T", vec!["x".to_string()]);
        for i in 0..5 {
            table.push_row(vec![CellValue::from(i as f64)]);
        }
        let mut md = String::new();
        MarkdownReporter::new().max_rows(2).write_table(&mut md, &table).unwrap();
        assert!(md.contains("| 1 |"));
        assert!(!md.contains("| 2 |"));
        assert!(md.contains("_3 more row(s) omitted._"));
    }
}
