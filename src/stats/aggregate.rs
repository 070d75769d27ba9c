//! Per-sheet summaries and run totals.

use crate::diff::{ComparisonRun, RecordKind, SheetComparisonResult, SheetOutcome};
use crate::model::Side;
use serde::{Deserialize, Serialize};

/// `num / den`, or 0 when `den` is 0.
#[must_use]
pub fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Availability of one configured identifier in one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierStat {
    pub name: String,
    pub in_a: bool,
    pub in_b: bool,
    /// Part of the composite key
    pub used: bool,
}

/// How often one common column disagreed among matched records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAccuracy {
    pub column: String,
    /// Records present on both sides
    pub compared: usize,
    pub mismatches: usize,
    /// `(compared - mismatches) / compared`
    pub accuracy: f64,
}

/// Summary of one compared sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetStats {
    pub sheet_name: String,
    pub identical: usize,
    pub modified: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    /// Row count of the table in A
    pub total_a: usize,
    /// Row count of the table in B
    pub total_b: usize,
    pub common_columns: usize,
    pub unique_columns_a: usize,
    pub unique_columns_b: usize,
    /// `identical / (identical + modified)`
    pub match_rate: f64,
    /// `(identical + modified) / distinct keys`
    pub data_coverage: f64,
    pub identifiers: Vec<IdentifierStat>,
    pub identifiers_missing: bool,
    pub columns: Vec<ColumnAccuracy>,
    pub duplicate_keys_a: usize,
    pub duplicate_keys_b: usize,
    pub malformed_values: usize,
}

impl SheetStats {
    /// Modified plus one-sided records.
    #[must_use]
    pub const fn differences(&self) -> usize {
        self.modified + self.only_in_a + self.only_in_b
    }
}

/// Summarize one sheet comparison.
#[must_use]
pub fn summarize(result: &SheetComparisonResult) -> SheetStats {
    let counts = result.counts();
    let matched = counts.matched();

    let identifiers = result
        .identifiers
        .configured
        .iter()
        .map(|name| IdentifierStat {
            name: name.clone(),
            in_a: result.identifiers.is_available(name, Side::A),
            in_b: result.identifiers.is_available(name, Side::B),
            used: result.identifiers.used.contains(name),
        })
        .collect();

    let columns = result
        .columns
        .common
        .iter()
        .map(|column| {
            let mismatches = result
                .records_of(RecordKind::Modified)
                .filter(|r| r.deltas().iter().any(|d| &d.column == column))
                .count();
            ColumnAccuracy {
                column: column.clone(),
                compared: matched,
                mismatches,
                accuracy: ratio(matched - mismatches, matched),
            }
        })
        .collect();

    SheetStats {
        sheet_name: result.sheet_name.clone(),
        identical: counts.identical,
        modified: counts.modified,
        only_in_a: counts.only_in_a,
        only_in_b: counts.only_in_b,
        total_a: result.shape_a.rows,
        total_b: result.shape_b.rows,
        common_columns: result.columns.common.len(),
        unique_columns_a: result.columns.only_in_a.len(),
        unique_columns_b: result.columns.only_in_b.len(),
        match_rate: ratio(counts.identical, matched),
        data_coverage: ratio(matched, counts.total()),
        identifiers,
        identifiers_missing: result.identifiers.identifiers_missing,
        columns,
        duplicate_keys_a: result.duplicate_keys(Side::A).count(),
        duplicate_keys_b: result.duplicate_keys(Side::B).count(),
        malformed_values: result.malformed_values(),
    }
}

/// How many compared sheets could use one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCoverage {
    pub name: String,
    pub sheets_with_a: usize,
    pub sheets_with_b: usize,
    pub sheets_used: usize,
}

/// Totals across a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct RunStats {
    pub sheets_total: usize,
    pub sheets_compared: usize,
    pub sheets_with_differences: usize,
    pub sheets_failed: usize,
    pub sheets_only_in_a: usize,
    pub sheets_only_in_b: usize,
    pub sheets_skipped: usize,
    pub identical: usize,
    pub modified: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub total_a: usize,
    pub total_b: usize,
    /// Recomputed from the summed counts
    pub match_rate: f64,
    /// Recomputed from the summed counts
    pub data_coverage: f64,
    pub identifiers: Vec<IdentifierCoverage>,
    /// Per-sheet stats in run order
    pub sheets: Vec<SheetStats>,
}

impl RunStats {
    /// Summarize every compared sheet and roll the counts up.
    pub fn from_run(run: &ComparisonRun) -> Self {
        let sheets: Vec<SheetStats> = run.compared().map(summarize).collect();

        let mut stats = Self {
            sheets_total: run.sheets.len(),
            sheets_compared: sheets.len(),
            sheets_with_differences: sheets.iter().filter(|s| s.differences() > 0).count(),
            sheets_failed: 0,
            sheets_only_in_a: 0,
            sheets_only_in_b: 0,
            sheets_skipped: 0,
            identical: 0,
            modified: 0,
            only_in_a: 0,
            only_in_b: 0,
            total_a: 0,
            total_b: 0,
            match_rate: 0.0,
            data_coverage: 0.0,
            identifiers: Vec::new(),
            sheets: Vec::new(),
        };

        for report in &run.sheets {
            match report.outcome {
                SheetOutcome::Failed { .. } => stats.sheets_failed += 1,
                SheetOutcome::OnlyInA { .. } => stats.sheets_only_in_a += 1,
                SheetOutcome::OnlyInB { .. } => stats.sheets_only_in_b += 1,
                SheetOutcome::Skipped => stats.sheets_skipped += 1,
                SheetOutcome::Compared { .. } => {}
            }
        }

        for sheet in &sheets {
            stats.identical += sheet.identical;
            stats.modified += sheet.modified;
            stats.only_in_a += sheet.only_in_a;
            stats.only_in_b += sheet.only_in_b;
            stats.total_a += sheet.total_a;
            stats.total_b += sheet.total_b;
        }
        let matched = stats.identical + stats.modified;
        stats.match_rate = ratio(stats.identical, matched);
        stats.data_coverage = ratio(matched, matched + stats.only_in_a + stats.only_in_b);

        stats.identifiers = run
            .identifiers
            .iter()
            .map(|name| IdentifierCoverage {
                name: name.to_string(),
                sheets_with_a: count_sheets(&sheets, name, |i| i.in_a),
                sheets_with_b: count_sheets(&sheets, name, |i| i.in_b),
                sheets_used: count_sheets(&sheets, name, |i| i.used),
            })
            .collect();
        stats.sheets = sheets;
        stats
    }

    /// Modified plus one-sided records across all sheets.
    #[must_use]
    pub const fn total_differences(&self) -> usize {
        self.modified + self.only_in_a + self.only_in_b
    }
}

fn count_sheets(sheets: &[SheetStats], name: &str, pred: impl Fn(&IdentifierStat) -> bool) -> usize {
    sheets
        .iter()
        .filter(|s| s.identifiers.iter().any(|i| i.name == name && pred(i)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{CellValue, Dataset, Table};

    fn sheet(rows: &[(&str, f64, &str)]) -> Table {
        let mut t = Table::new(["Channel Name", "Value", "Note"]);
        for (k, v, n) in rows {
            t.push_values([CellValue::from(*k), CellValue::from(*v), CellValue::from(*n)]);
        }
        t
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn test_summarize_rates_and_columns() {
        let a = sheet(&[("x", 1.0, "n"), ("y", 2.0, "n"), ("z", 3.0, "n"), ("q", 0.0, "n")]);
        let b = sheet(&[("x", 1.0, "n"), ("y", 9.0, "n"), ("z", 3.0, "changed"), ("w", 0.0, "n")]);
        let result = DiffEngine::default()
            .compare("s", &a, &b, &crate::diff::NoProgress)
            .unwrap();
        let stats = summarize(&result);

        assert_eq!((stats.identical, stats.modified), (1, 2));
        assert_eq!((stats.only_in_a, stats.only_in_b), (1, 1));
        assert!((stats.match_rate - 1.0 / 3.0).abs() < 1e-12);
        assert!((stats.data_coverage - 3.0 / 5.0).abs() < 1e-12);
        assert_eq!(stats.common_columns, 3);

        let value = stats.columns.iter().find(|c| c.column == "Value").unwrap();
        assert_eq!((value.compared, value.mismatches), (3, 1));
        let key = stats.columns.iter().find(|c| c.column == "Channel Name").unwrap();
        assert_eq!(key.accuracy, 1.0);

        let channel = &stats.identifiers[0];
        assert!(channel.in_a && channel.in_b && channel.used);
        assert!(!stats.identifiers[1].in_a);
    }

    #[test]
    fn test_empty_sheet_rates_are_zero() {
        let result = DiffEngine::default()
            .compare("s", &sheet(&[]), &sheet(&[]), &crate::diff::NoProgress)
            .unwrap();
        let stats = summarize(&result);
        assert_eq!(stats.match_rate, 0.0);
        assert_eq!(stats.data_coverage, 0.0);
        assert!(stats.columns.iter().all(|c| c.accuracy == 0.0));
    }

    #[test]
    fn test_run_totals_are_summed() {
        let a = Dataset::new("a")
            .with_sheet("S1", sheet(&[("x", 1.0, "n"), ("y", 2.0, "n")]))
            .with_sheet("S2", sheet(&[("x", 1.0, "n")]))
            .with_sheet("OnlyA", sheet(&[]));
        let b = Dataset::new("b")
            .with_sheet("S1", sheet(&[("x", 1.0, "n"), ("y", 3.0, "n")]))
            .with_sheet("S2", sheet(&[("x", 1.0, "n"), ("k", 1.0, "n")]));
        let run = DiffEngine::default().compare_datasets(&a, &b).unwrap();
        let stats = RunStats::from_run(&run);

        assert_eq!(stats.sheets_total, 3);
        assert_eq!(stats.sheets_compared, 2);
        assert_eq!(stats.sheets_with_differences, 2);
        assert_eq!(stats.sheets_only_in_a, 1);
        assert_eq!(stats.identical, 2);
        assert_eq!(stats.modified, 1);
        assert_eq!(stats.only_in_b, 1);
        assert_eq!(stats.total_differences(), 2);
        assert!((stats.match_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.data_coverage - 3.0 / 4.0).abs() < 1e-12);

        let channel = &stats.identifiers[0];
        assert_eq!(channel.name, "Channel Name");
        assert_eq!((channel.sheets_with_a, channel.sheets_used), (2, 2));
        assert_eq!(stats.identifiers[1].sheets_used, 0);
    }
}
