//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable overview of a run: one aligned line per
//! sheet, a few sample differences per compared sheet and an overall verdict.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{ComparisonRun, RecordKind, SheetComparisonResult, SheetOutcome};
use crate::model::Side;
use crate::stats::RunStats;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Pad `s` with spaces to `width` terminal columns.
fn pad(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - w))
    }
}

/// Cut `s` to at most `max_width` terminal columns, marking the cut with `...`.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

const SAMPLE_WIDTH: usize = 100;

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn status_color(outcome: &SheetOutcome) -> &'static str {
        match outcome {
            SheetOutcome::Compared { result } if result.has_differences() => "yellow",
            SheetOutcome::Compared { .. } => "green",
            SheetOutcome::Failed { .. } => "red",
            SheetOutcome::OnlyInA { .. } | SheetOutcome::OnlyInB { .. } => "cyan",
            SheetOutcome::Skipped => "dim",
        }
    }

    fn sheet_detail(
        &self,
        run: &ComparisonRun,
        result: &SheetComparisonResult,
        config: &ReportConfig,
        lines: &mut Vec<String>,
    ) {
        lines.push(String::new());
        lines.push(self.color(&format!("Sheet {}", result.sheet_name), "bold"));

        let modified: Vec<_> = result.records_of(RecordKind::Modified).collect();
        if !modified.is_empty() {
            lines.push(format!(
                "  {} (showing {} of {}):",
                self.color("Modified", "yellow"),
                modified.len().min(config.max_modifications),
                modified.len()
            ));
            for record in modified.iter().take(config.max_modifications) {
                let changes = record
                    .deltas()
                    .iter()
                    .map(|d| format!("{}: {} → {}", d.column, d.a, d.b))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!(
                    "    {}  {}",
                    self.color(&record.key().value, "cyan"),
                    truncate(&changes, SAMPLE_WIDTH)
                ));
            }
        }

        for (side, kind, sign, color) in [
            (Side::A, RecordKind::OnlyInA, "-", "red"),
            (Side::B, RecordKind::OnlyInB, "+", "green"),
        ] {
            let rows: Vec<_> = result.records_of(kind).collect();
            if rows.is_empty() {
                continue;
            }
            lines.push(format!(
                "  {} (showing {} of {}):",
                self.color(&format!("Only in {}", run.label(side)), color),
                rows.len().min(config.max_unmatched_rows),
                rows.len()
            ));
            for record in rows.iter().take(config.max_unmatched_rows) {
                let values = record
                    .row()
                    .map(|row| {
                        row.values()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" | ")
                    })
                    .unwrap_or_default();
                lines.push(format!(
                    "    {} {}",
                    self.color(sign, color),
                    truncate(&values, SAMPLE_WIDTH)
                ));
            }
        }

        if !result.warnings.is_empty() {
            lines.push(format!("  {}", self.color("Warnings:", "yellow")));
            for warning in &result.warnings {
                lines.push(format!("    {}", truncate(&warning.to_string(), SAMPLE_WIDTH)));
            }
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        // Header
        let title = config.title.as_deref().unwrap_or("Sheet Diff Summary");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {} → {}",
            self.color("Datasets:", "cyan"),
            run.label_a,
            run.label_b
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Identifiers:", "cyan"),
            run.identifiers.columns().join(", ")
        ));

        // One aligned line per sheet
        lines.push(String::new());
        lines.push(self.color("Sheets:", "bold"));
        let name_width = run
            .sheets
            .iter()
            .map(|s| s.name.width())
            .max()
            .unwrap_or(0)
            .min(40);

        for report in &run.sheets {
            let name = pad(&truncate(&report.name, 40), name_width);
            let status = self.color(
                &pad(report.outcome.label(), 9),
                Self::status_color(&report.outcome),
            );
            let detail = match &report.outcome {
                SheetOutcome::Compared { result } => {
                    let c = result.counts();
                    let mut detail = format!(
                        "{} identical, {} modified, {} only in {}, {} only in {}",
                        c.identical,
                        c.modified,
                        c.only_in_a,
                        run.label_a,
                        c.only_in_b,
                        run.label_b
                    );
                    if result.identifiers.identifiers_missing {
                        detail.push_str(" (fallback keys)");
                    }
                    detail
                }
                SheetOutcome::Failed { reason } => truncate(reason, SAMPLE_WIDTH),
                SheetOutcome::OnlyInA { shape } => format!("{} rows", shape.rows),
                SheetOutcome::OnlyInB { shape } => format!("{} rows", shape.rows),
                SheetOutcome::Skipped => "cancelled".to_string(),
            };
            lines.push(format!("  {name}  {status}  {detail}"));
        }

        for result in run.compared().filter(|r| r.has_differences() || !r.warnings.is_empty()) {
            self.sheet_detail(run, result, config, &mut lines);
        }

        // Totals
        lines.push(String::new());
        lines.push(self.color("Totals:", "bold"));
        lines.push(format!(
            "  {} sheets compared, {} with differences, {} failed",
            stats.sheets_compared, stats.sheets_with_differences, stats.sheets_failed
        ));
        lines.push(format!(
            "  {} identical, {} modified, {} only in {}, {} only in {}",
            stats.identical,
            stats.modified,
            stats.only_in_a,
            run.label_a,
            stats.only_in_b,
            run.label_b
        ));

        let rate = stats.match_rate * 100.0;
        let rate_color = if rate > 99.0 {
            "green"
        } else if rate > 90.0 {
            "yellow"
        } else {
            "red"
        };
        lines.push(format!(
            "{}  {}",
            self.color("Match rate:", "cyan"),
            self.color(&format!("{rate:.2}%"), rate_color)
        ));
        lines.push(format!(
            "{}  {:.2}%",
            self.color("Coverage:", "cyan"),
            stats.data_coverage * 100.0
        ));

        lines.push(String::new());
        let verdict = if run.has_differences() {
            self.color("Result: DIFFERENCES FOUND", "red")
        } else {
            self.color("Result: IDENTICAL", "green")
        };
        lines.push(verdict);
        if run.cancelled {
            lines.push(self.color("Comparison was cancelled before all sheets ran", "yellow"));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
