//! Key-based sheet diff engine.

use super::engine_config::DiffOptions;
use super::progress::{ProgressEvent, ProgressSink};
use super::result::{
    ColumnDelta, ColumnOverlap, ComparisonWarning, DiffRecord, IdentifierAvailability,
    SheetComparisonResult,
};
use crate::error::{CompareErrorKind, Result, SheetDiffError};
use crate::matching::{
    available_identifiers, shared_identifiers, DuplicatePolicy, FallbackStrategy, IndexedRow,
    KeyBuilder, NoIdentifiersAvailable, SheetIndex,
};
use crate::model::{cell, IdentifierSpec, NumericTolerance, Row, Side, Table};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Compares tables by composite business key.
///
/// ```
/// use sheet_diff::diff::{DiffEngine, NoProgress};
/// use sheet_diff::model::{CellValue, Table};
///
/// let mut a = Table::new(["Channel Name", "Value"]);
/// a.push_values([CellValue::from("Zee TV"), CellValue::from(10.0)]);
/// let mut b = Table::new(["Channel Name", "Value"]);
/// b.push_values([CellValue::from("Zee TV"), CellValue::from(20.0)]);
///
/// let result = DiffEngine::default().compare("Sheet1", &a, &b, &NoProgress)?;
/// assert_eq!(result.counts().modified, 1);
/// # Ok::<(), sheet_diff::SheetDiffError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    identifiers: IdentifierSpec,
    options: DiffOptions,
}

/// A key waiting to be classified, with the rows found for it.
enum Pending<'i, 'a> {
    Both(&'i IndexedRow<'a>, &'i IndexedRow<'a>),
    OnlyA(&'i IndexedRow<'a>),
    OnlyB(&'i IndexedRow<'a>),
}

impl DiffEngine {
    /// Create an engine keyed on `identifiers` with default options.
    #[must_use]
    pub fn new(identifiers: IdentifierSpec) -> Self {
        Self {
            identifiers,
            options: DiffOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: NumericTolerance) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.options.duplicate_policy = policy;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackStrategy) -> Self {
        self.options.fallback = fallback;
        self
    }

    /// Enable or disable rayon parallelism.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.options.parallel = enabled;
        self
    }

    #[must_use]
    pub fn identifiers(&self) -> &IdentifierSpec {
        &self.identifiers
    }

    #[must_use]
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare two versions of one sheet.
    ///
    /// Fails only when a table declares no columns. Missing identifiers,
    /// duplicate keys and malformed identifier values are reported as
    /// warnings in the result.
    pub fn compare(
        &self,
        sheet: &str,
        table_a: &Table,
        table_b: &Table,
        progress: &dyn ProgressSink,
    ) -> Result<SheetComparisonResult> {
        if table_a.column_count() == 0 || table_b.column_count() == 0 {
            return Err(SheetDiffError::invalid_table(sheet));
        }

        let columns = ColumnOverlap::compute(table_a.columns(), table_b.columns());
        let available_a = available_identifiers(&self.identifiers, table_a.columns());
        let available_b = available_identifiers(&self.identifiers, table_b.columns());
        let used = shared_identifiers(&self.identifiers, table_a.columns(), table_b.columns());
        let mut warnings = Vec::new();

        let (keys_a, keys_b) = match KeyBuilder::from_identifiers(used.clone()) {
            Ok(keys) => (keys.clone(), keys),
            Err(NoIdentifiersAvailable) => {
                let missing_in = |available: &[String]| -> Vec<String> {
                    self.identifiers
                        .iter()
                        .filter(|id| !available.iter().any(|c| c == id))
                        .map(str::to_string)
                        .collect()
                };
                tracing::warn!(
                    sheet = %sheet,
                    fallback = %self.options.fallback,
                    "No identifier column is shared by both tables"
                );
                warnings.push(ComparisonWarning::NoIdentifiersAvailable {
                    fallback: self.options.fallback,
                    missing_in_a: missing_in(&available_a),
                    missing_in_b: missing_in(&available_b),
                });
                self.fallback_keys(sheet, &columns, table_a, table_b)?
            }
        };

        let policy = self.options.duplicate_policy;
        let (index_a, index_b) = if self.options.parallel {
            rayon::join(
                || SheetIndex::build(table_a, &keys_a, policy),
                || SheetIndex::build(table_b, &keys_b, policy),
            )
        } else {
            (
                SheetIndex::build(table_a, &keys_a, policy),
                SheetIndex::build(table_b, &keys_b, policy),
            )
        };

        for (side, index) in [(Side::A, &index_a), (Side::B, &index_b)] {
            if !index.duplicates().is_empty() {
                tracing::warn!(
                    sheet = %sheet,
                    side = %side,
                    duplicate_keys = index.duplicates().len(),
                    "Duplicate keys found; one row kept per key"
                );
            }
            warnings.extend(index.duplicates().iter().map(|d| {
                ComparisonWarning::DuplicateKey {
                    side,
                    key: d.key.clone(),
                    positions: d.positions.clone(),
                    retained: d.retained,
                }
            }));
            warnings.extend(index.malformed().iter().map(|m| {
                ComparisonWarning::MalformedValue {
                    side,
                    position: m.position,
                    column: m.column.clone(),
                    raw: m.raw.clone(),
                }
            }));
        }

        let mut pending: Vec<Pending<'_, '_>> = Vec::with_capacity(index_a.len() + index_b.len());
        for entry_a in index_a.iter() {
            match index_b.get(&entry_a.key.value) {
                Some(entry_b) => pending.push(Pending::Both(entry_a, entry_b)),
                None => pending.push(Pending::OnlyA(entry_a)),
            }
        }
        pending.extend(
            index_b
                .iter()
                .filter(|entry_b| !index_a.contains_key(&entry_b.key.value))
                .map(Pending::OnlyB),
        );

        let total = pending.len();
        let completed = AtomicUsize::new(0);
        let tolerance = self.options.tolerance;
        progress.on_sheet_start(sheet, total);

        let classify = |item: &Pending<'_, '_>| -> DiffRecord {
            let record = classify_pending(item, &columns.common, &tolerance);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.on_progress(&ProgressEvent {
                sheet,
                completed: done,
                total,
            });
            record
        };

        let records: Vec<DiffRecord> = if self.options.use_parallel(total) {
            pending.par_iter().map(classify).collect()
        } else {
            pending.iter().map(classify).collect()
        };
        progress.on_sheet_complete(sheet);

        let identifiers_missing = keys_a.is_fallback();
        let missing = self
            .identifiers
            .iter()
            .filter(|id| !used.iter().any(|u| u == id))
            .map(str::to_string)
            .collect();

        tracing::debug!(
            sheet = %sheet,
            keys = total,
            rows_a = table_a.row_count(),
            rows_b = table_b.row_count(),
            "Sheet compared"
        );

        Ok(SheetComparisonResult {
            sheet_name: sheet.to_string(),
            records,
            identifiers: IdentifierAvailability {
                configured: self.identifiers.columns().to_vec(),
                available_a,
                available_b,
                used,
                missing,
                strategy: keys_a.strategy().clone(),
                identifiers_missing,
            },
            columns,
            shape_a: table_a.shape(),
            shape_b: table_b.shape(),
            warnings,
        })
    }

    /// Key builders for a sheet without shared identifiers.
    fn fallback_keys(
        &self,
        sheet: &str,
        columns: &ColumnOverlap,
        table_a: &Table,
        table_b: &Table,
    ) -> Result<(KeyBuilder, KeyBuilder)> {
        match self.options.fallback {
            FallbackStrategy::ContentHash if columns.common.is_empty() => Ok((
                KeyBuilder::content_hash(table_a.columns().to_vec()),
                KeyBuilder::content_hash(table_b.columns().to_vec()),
            )),
            FallbackStrategy::ContentHash => {
                let keys = KeyBuilder::content_hash(columns.common.clone());
                Ok((keys.clone(), keys))
            }
            FallbackStrategy::RowPosition => {
                Ok((KeyBuilder::row_position(), KeyBuilder::row_position()))
            }
            FallbackStrategy::Fail => Err(SheetDiffError::compare(
                format!("sheet '{sheet}'"),
                CompareErrorKind::NoIdentifiersAvailable {
                    sheet: sheet.to_string(),
                },
            )),
        }
    }
}

fn classify_pending(
    item: &Pending<'_, '_>,
    common: &[String],
    tolerance: &NumericTolerance,
) -> DiffRecord {
    match item {
        Pending::Both(a, b) => {
            let deltas = diff_rows(a.row, b.row, common, tolerance);
            if deltas.is_empty() {
                DiffRecord::Identical {
                    key: a.key.clone(),
                    position_a: a.position,
                    position_b: b.position,
                }
            } else {
                DiffRecord::Modified {
                    key: a.key.clone(),
                    position_a: a.position,
                    position_b: b.position,
                    deltas,
                }
            }
        }
        Pending::OnlyA(a) => DiffRecord::OnlyInA {
            key: a.key.clone(),
            position: a.position,
            row: a.row.clone(),
        },
        Pending::OnlyB(b) => DiffRecord::OnlyInB {
            key: b.key.clone(),
            position: b.position,
            row: b.row.clone(),
        },
    }
}

/// Differing common columns of two rows, in column order.
#[must_use]
pub fn diff_rows(
    row_a: &Row,
    row_b: &Row,
    common: &[String],
    tolerance: &NumericTolerance,
) -> Vec<ColumnDelta> {
    common
        .iter()
        .filter_map(|column| {
            let a = cell(row_a, column);
            let b = cell(row_b, column);
            (!a.equivalent(b, tolerance)).then(|| ColumnDelta {
                column: column.clone(),
                a: a.clone(),
                b: b.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{NoProgress, ProgressFn, RecordKind};
    use crate::model::{row, CellValue};

    fn table(rows: &[(&str, f64)]) -> Table {
        let mut t = Table::new(["Channel Name", "Value"]);
        for (name, value) in rows {
            t.push_values([CellValue::from(*name), CellValue::from(*value)]);
        }
        t
    }

    #[test]
    fn test_engine_creation() {
        let engine = DiffEngine::default();
        assert_eq!(engine.identifiers(), &IdentifierSpec::default());
        assert!(engine.options().parallel);
    }

    #[test]
    fn test_classification_order() {
        let a = table(&[("x", 1.0), ("y", 2.0), ("z", 3.0)]);
        let b = table(&[("w", 0.0), ("z", 3.0), ("y", 5.0)]);
        let result = DiffEngine::default().compare("s", &a, &b, &NoProgress).unwrap();

        let kinds: Vec<(&str, RecordKind)> = result
            .records
            .iter()
            .map(|r| (r.key().as_str(), r.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("x", RecordKind::OnlyInA),
                ("y", RecordKind::Modified),
                ("z", RecordKind::Identical),
                ("w", RecordKind::OnlyInB),
            ]
        );
        assert_eq!(result.records[1].deltas()[0].column, "Value");
        assert_eq!(result.records[1].positions(), (Some(1), Some(2)));
    }

    #[test]
    fn test_native_and_text_identifiers_share_keys() {
        let columns = ["Channel Name", "Program Date", "Clip Start Time", "Value"];
        let mut a = Table::new(columns);
        a.push_values([
            CellValue::from("Zee TV"),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            CellValue::Time(chrono::NaiveTime::from_hms_opt(14, 30, 0).unwrap()),
            CellValue::from(10.0),
        ]);
        let mut b = Table::new(columns);
        b.push_values([
            CellValue::from("Zee TV"),
            CellValue::from("15/01/2024"),
            CellValue::from("14:30"),
            CellValue::from(20.0),
        ]);

        let result = DiffEngine::default().compare("Jan", &a, &b, &NoProgress).unwrap();
        assert_eq!(result.records.len(), 1);
        let record = &result.records[0];
        assert_eq!(record.key().as_str(), "Zee TV|2024-01-15|14:30:00");
        assert_eq!(record.deltas().len(), 1);
        assert_eq!(record.deltas()[0].column, "Value");
        assert_eq!(record.deltas()[0].a, CellValue::Number(10.0));
        assert_eq!(record.deltas()[0].b, CellValue::Number(20.0));
    }

    #[test]
    fn test_numeric_text_identifiers_match_numbers() {
        let engine = DiffEngine::new(IdentifierSpec::new(["Account"]).unwrap());
        let mut a = Table::new(["Account", "Value"]);
        a.push_values([CellValue::from(10.0), CellValue::from(1.0)]);
        a.push_values([CellValue::from(1500.0), CellValue::from(2.0)]);
        let mut b = Table::new(["Account", "Value"]);
        b.push_values([CellValue::from("10.0"), CellValue::from(1.0)]);
        b.push_values([CellValue::from(" 1.5e3 "), CellValue::from(2.0)]);

        let result = engine.compare("s", &a, &b, &NoProgress).unwrap();
        let counts = result.counts();
        assert_eq!(counts.identical, 2);
        assert_eq!(counts.only_in_a + counts.only_in_b, 0);
        assert_eq!(result.records[0].key().as_str(), "10");
        assert_eq!(result.records[1].key().as_str(), "1500");
    }

    #[test]
    fn test_zero_column_table_is_invalid() {
        let a = Table::default();
        let b = table(&[]);
        let err = DiffEngine::default()
            .compare("Broken", &a, &b, &NoProgress)
            .unwrap_err();
        assert!(matches!(
            err.compare_kind(),
            Some(CompareErrorKind::InvalidTable { sheet }) if sheet == "Broken"
        ));
    }

    #[test]
    fn test_empty_tables_are_valid() {
        let result = DiffEngine::default()
            .compare("s", &table(&[]), &table(&[]), &NoProgress)
            .unwrap();
        assert!(result.records.is_empty());
        assert!(!result.has_differences());
    }

    #[test]
    fn test_fallback_fail() {
        let a = Table::with_rows(["v"], vec![row([("v", CellValue::from(1.0))])]);
        let err = DiffEngine::default()
            .with_fallback(FallbackStrategy::Fail)
            .compare("s", &a, &a, &NoProgress)
            .unwrap_err();
        assert!(matches!(
            err.compare_kind(),
            Some(CompareErrorKind::NoIdentifiersAvailable { .. })
        ));
    }

    #[test]
    fn test_row_position_fallback_reports_modifications() {
        let a = Table::with_rows(["v"], vec![row([("v", CellValue::from(1.0))])]);
        let b = Table::with_rows(["v"], vec![row([("v", CellValue::from(2.0))])]);
        let result = DiffEngine::default()
            .with_fallback(FallbackStrategy::RowPosition)
            .compare("s", &a, &b, &NoProgress)
            .unwrap();
        assert!(result.identifiers.identifiers_missing);
        assert_eq!(result.counts().modified, 1);
    }

    #[test]
    fn test_progress_reaches_total() {
        let a = table(&[("x", 1.0), ("y", 2.0)]);
        let b = table(&[("y", 2.0), ("q", 2.0)]);
        let max_seen = AtomicUsize::new(0);
        let events = AtomicUsize::new(0);
        let sink = ProgressFn(|e: &ProgressEvent<'_>| {
            assert_eq!(e.total, 3);
            max_seen.fetch_max(e.completed, Ordering::Relaxed);
            events.fetch_add(1, Ordering::Relaxed);
        });
        DiffEngine::default().compare("s", &a, &b, &sink).unwrap();
        assert_eq!(max_seen.load(Ordering::Relaxed), 3);
        assert_eq!(events.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows_a: Vec<(String, f64)> = (0..500).map(|i| (format!("k{i}"), i as f64)).collect();
        let rows_b: Vec<(String, f64)> = (250..800)
            .map(|i| (format!("k{i}"), if i % 7 == 0 { -1.0 } else { i as f64 }))
            .collect();
        let build = |rows: &[(String, f64)]| {
            let mut t = Table::new(["Channel Name", "Value"]);
            for (k, v) in rows {
                t.push_values([CellValue::from(k.as_str()), CellValue::from(*v)]);
            }
            t
        };
        let (a, b) = (build(&rows_a), build(&rows_b));

        let mut parallel = DiffOptions::default();
        parallel.parallel_threshold = 1;
        let par = DiffEngine::default()
            .with_options(parallel)
            .compare("s", &a, &b, &NoProgress)
            .unwrap();
        let seq = DiffEngine::default()
            .with_options(DiffOptions::sequential())
            .compare("s", &a, &b, &NoProgress)
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_diff_rows_uses_tolerance() {
        let a = row([("v", CellValue::from(1.0)), ("w", CellValue::text("x"))]);
        let b = row([("v", CellValue::from(1.0 + 1e-12)), ("w", CellValue::text("y"))]);
        let common = vec!["v".to_string(), "w".to_string()];
        let deltas = diff_rows(&a, &b, &common, &NumericTolerance::default());
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].column, "w");
        assert_eq!(
            diff_rows(&a, &b, &common, &NumericTolerance::exact()).len(),
            2
        );
    }
}
