//! Diff result types.

use crate::matching::{FallbackStrategy, KeyStrategy, RecordKey};
use crate::model::{CellValue, Row, Side, TableShape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One differing column of a modified record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDelta {
    pub column: String,
    pub a: CellValue,
    pub b: CellValue,
}

/// Classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Identical,
    Modified,
    OnlyInA,
    OnlyInB,
}

impl RecordKind {
    /// Upper-case label used in tabular reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identical => "IDENTICAL",
            Self::Modified => "MODIFIED",
            Self::OnlyInA => "ONLY_IN_A",
            Self::OnlyInB => "ONLY_IN_B",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome for a single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffRecord {
    /// Present on both sides with equivalent values in every common column
    Identical {
        key: RecordKey,
        position_a: usize,
        position_b: usize,
    },
    /// Present on both sides; `deltas` lists the differing common columns in column order
    Modified {
        key: RecordKey,
        position_a: usize,
        position_b: usize,
        deltas: Vec<ColumnDelta>,
    },
    /// Present only in dataset A
    OnlyInA {
        key: RecordKey,
        position: usize,
        row: Row,
    },
    /// Present only in dataset B
    OnlyInB {
        key: RecordKey,
        position: usize,
        row: Row,
    },
}

impl DiffRecord {
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Identical { key, .. }
            | Self::Modified { key, .. }
            | Self::OnlyInA { key, .. }
            | Self::OnlyInB { key, .. } => key,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Identical { .. } => RecordKind::Identical,
            Self::Modified { .. } => RecordKind::Modified,
            Self::OnlyInA { .. } => RecordKind::OnlyInA,
            Self::OnlyInB { .. } => RecordKind::OnlyInB,
        }
    }

    /// Column deltas; empty unless modified.
    #[must_use]
    pub fn deltas(&self) -> &[ColumnDelta] {
        match self {
            Self::Modified { deltas, .. } => deltas,
            _ => &[],
        }
    }

    /// Source positions in A and B, where present.
    #[must_use]
    pub fn positions(&self) -> (Option<usize>, Option<usize>) {
        match self {
            Self::Identical {
                position_a,
                position_b,
                ..
            }
            | Self::Modified {
                position_a,
                position_b,
                ..
            } => (Some(*position_a), Some(*position_b)),
            Self::OnlyInA { position, .. } => (Some(*position), None),
            Self::OnlyInB { position, .. } => (None, Some(*position)),
        }
    }

    /// Full row for one-sided records.
    #[must_use]
    pub fn row(&self) -> Option<&Row> {
        match self {
            Self::OnlyInA { row, .. } | Self::OnlyInB { row, .. } => Some(row),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_difference(&self) -> bool {
        !matches!(self, Self::Identical { .. })
    }
}

/// Column sets of the two tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnOverlap {
    /// Columns present in both, in A's order
    pub common: Vec<String>,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
}

impl ColumnOverlap {
    #[must_use]
    pub fn compute(columns_a: &[String], columns_b: &[String]) -> Self {
        let common = columns_a
            .iter()
            .filter(|c| columns_b.contains(c))
            .cloned()
            .collect();
        let only_in_a = columns_a
            .iter()
            .filter(|c| !columns_b.contains(c))
            .cloned()
            .collect();
        let only_in_b = columns_b
            .iter()
            .filter(|c| !columns_a.contains(c))
            .cloned()
            .collect();
        Self {
            common,
            only_in_a,
            only_in_b,
        }
    }

    /// True when both tables have the same column set.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }
}

/// Which identifier columns could be used for a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierAvailability {
    /// The configured identifiers, in order
    pub configured: Vec<String>,
    pub available_a: Vec<String>,
    pub available_b: Vec<String>,
    /// Identifiers available on both sides; the key parts
    pub used: Vec<String>,
    /// Configured identifiers not usable for keying
    pub missing: Vec<String>,
    /// How the keys were actually built
    pub strategy: KeyStrategy,
    /// True when keys did not come from identifier columns
    pub identifiers_missing: bool,
}

impl IdentifierAvailability {
    /// Whether `identifier` exists in the table on `side`.
    #[must_use]
    pub fn is_available(&self, identifier: &str, side: Side) -> bool {
        let list = match side {
            Side::A => &self.available_a,
            Side::B => &self.available_b,
        };
        list.iter().any(|c| c == identifier)
    }
}

/// Non-fatal finding raised while comparing a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonWarning {
    /// No configured identifier is present in both tables
    NoIdentifiersAvailable {
        fallback: FallbackStrategy,
        missing_in_a: Vec<String>,
        missing_in_b: Vec<String>,
    },
    /// Several rows of one table produced the same key
    DuplicateKey {
        side: Side,
        key: String,
        positions: Vec<usize>,
        retained: usize,
    },
    /// Text in a date/time identifier column that is not a date or time
    MalformedValue {
        side: Side,
        position: usize,
        column: String,
        raw: String,
    },
}

impl fmt::Display for ComparisonWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoIdentifiersAvailable { fallback, .. } => {
                write!(f, "no shared identifier columns; keyed by {fallback}")
            }
            Self::DuplicateKey {
                side,
                key,
                positions,
                retained,
            } => write!(
                f,
                "key '{key}' appears {} times in {side}; kept row {retained}",
                positions.len()
            ),
            Self::MalformedValue {
                side,
                position,
                column,
                raw,
            } => write!(
                f,
                "'{raw}' in {side} column '{column}' (row {position}) is not a date or time"
            ),
        }
    }
}

/// Record counts per classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordCounts {
    pub identical: usize,
    pub modified: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
}

impl RecordCounts {
    /// Keys present on both sides.
    #[must_use]
    pub const fn matched(&self) -> usize {
        self.identical + self.modified
    }

    /// Every distinct key across both sides.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.identical + self.modified + self.only_in_a + self.only_in_b
    }

    #[must_use]
    pub const fn differences(&self) -> usize {
        self.modified + self.only_in_a + self.only_in_b
    }
}

/// Everything learned from comparing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct SheetComparisonResult {
    pub sheet_name: String,
    /// One record per distinct key: A's keys in first-seen order, then B-only keys
    pub records: Vec<DiffRecord>,
    pub identifiers: IdentifierAvailability,
    pub columns: ColumnOverlap,
    pub shape_a: TableShape,
    pub shape_b: TableShape,
    pub warnings: Vec<ComparisonWarning>,
}

impl SheetComparisonResult {
    #[must_use]
    pub fn counts(&self) -> RecordCounts {
        let mut counts = RecordCounts::default();
        for record in &self.records {
            match record.kind() {
                RecordKind::Identical => counts.identical += 1,
                RecordKind::Modified => counts.modified += 1,
                RecordKind::OnlyInA => counts.only_in_a += 1,
                RecordKind::OnlyInB => counts.only_in_b += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn has_differences(&self) -> bool {
        self.records.iter().any(DiffRecord::is_difference)
    }

    /// Records of one classification, in result order.
    pub fn records_of(&self, kind: RecordKind) -> impl Iterator<Item = &DiffRecord> {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    /// Duplicate-key warnings for one side.
    pub fn duplicate_keys(&self, side: Side) -> impl Iterator<Item = &ComparisonWarning> {
        self.warnings.iter().filter(move |w| {
            matches!(w, ComparisonWarning::DuplicateKey { side: s, .. } if *s == side)
        })
    }

    /// Rows of `side` that were dropped from the index because their key repeated.
    #[must_use]
    pub fn collapsed_rows(&self, side: Side) -> usize {
        self.duplicate_keys(side)
            .map(|w| match w {
                ComparisonWarning::DuplicateKey { positions, .. } => {
                    positions.len().saturating_sub(1)
                }
                _ => 0,
            })
            .sum()
    }

    /// Count of malformed identifier values on both sides.
    #[must_use]
    pub fn malformed_values(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ComparisonWarning::MalformedValue { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_column_overlap() {
        let overlap = ColumnOverlap::compute(&cols(&["a", "b", "c"]), &cols(&["c", "d", "a"]));
        assert_eq!(overlap.common, cols(&["a", "c"]));
        assert_eq!(overlap.only_in_a, cols(&["b"]));
        assert_eq!(overlap.only_in_b, cols(&["d"]));
        assert!(!overlap.is_aligned());
        assert!(ColumnOverlap::compute(&cols(&["x"]), &cols(&["x"])).is_aligned());
    }

    #[test]
    fn test_record_accessors() {
        let record = DiffRecord::Modified {
            key: RecordKey::new("k"),
            position_a: 1,
            position_b: 2,
            deltas: vec![ColumnDelta {
                column: "Value".to_string(),
                a: 10.0.into(),
                b: 20.0.into(),
            }],
        };
        assert_eq!(record.kind(), RecordKind::Modified);
        assert_eq!(record.positions(), (Some(1), Some(2)));
        assert_eq!(record.deltas().len(), 1);
        assert!(record.row().is_none());
        assert!(record.is_difference());
        assert_eq!(record.kind().label(), "MODIFIED");
    }

    #[test]
    fn test_record_serializes_with_kind_tag() {
        let record = DiffRecord::Identical {
            key: RecordKey::new("k"),
            position_a: 0,
            position_b: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "identical");
        assert_eq!(json["key"]["value"], "k");
    }

    #[test]
    fn test_counts() {
        let counts = RecordCounts {
            identical: 3,
            modified: 1,
            only_in_a: 2,
            only_in_b: 0,
        };
        assert_eq!(counts.matched(), 4);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.differences(), 3);
    }
}
