//! Whole-dataset comparison.
//!
//! Sheets are matched by name. Each sheet present in both datasets is compared
//! independently: a sheet that cannot be compared is recorded as failed and the
//! run moves on. Only a run with no sheets at all is an error.

use super::engine::DiffEngine;
use super::progress::{CancellationToken, NoProgress, ProgressSink};
use super::result::SheetComparisonResult;
use crate::error::{CompareErrorKind, Result, SheetDiffError};
use crate::model::{Dataset, IdentifierSpec, Side, TableShape};
use serde::{Deserialize, Serialize};

/// What happened to one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    /// Present in both datasets and compared
    Compared { result: Box<SheetComparisonResult> },
    /// Present in both datasets but not comparable
    Failed { reason: String },
    /// Present only in dataset A
    OnlyInA { shape: TableShape },
    /// Present only in dataset B
    OnlyInB { shape: TableShape },
    /// Not started because the run was cancelled
    Skipped,
}

impl SheetOutcome {
    /// Short status label for tabular reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Compared { .. } => "COMPARED",
            Self::Failed { .. } => "FAILED",
            Self::OnlyInA { .. } => "ONLY_IN_A",
            Self::OnlyInB { .. } => "ONLY_IN_B",
            Self::Skipped => "SKIPPED",
        }
    }
}

/// One sheet of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: SheetOutcome,
}

impl SheetReport {
    #[must_use]
    pub fn result(&self) -> Option<&SheetComparisonResult> {
        match &self.outcome {
            SheetOutcome::Compared { result } => Some(result),
            _ => None,
        }
    }
}

/// The full outcome of comparing two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct ComparisonRun {
    pub label_a: String,
    pub label_b: String,
    pub identifiers: IdentifierSpec,
    /// A's sheets in workbook order, then sheets found only in B
    pub sheets: Vec<SheetReport>,
    /// True when cancellation stopped the run before every sheet was compared
    pub cancelled: bool,
}

impl ComparisonRun {
    /// Results of compared sheets, in run order.
    pub fn compared(&self) -> impl Iterator<Item = &SheetComparisonResult> {
        self.sheets.iter().filter_map(SheetReport::result)
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&SheetReport> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Dataset label for a side.
    #[must_use]
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.label_a,
            Side::B => &self.label_b,
        }
    }

    /// Names of sheets with the given outcome label.
    pub fn sheets_with_status(&self, label: &'static str) -> impl Iterator<Item = &str> {
        self.sheets
            .iter()
            .filter(move |s| s.outcome.label() == label)
            .map(|s| s.name.as_str())
    }

    /// True when any compared sheet differs or the sheet sets differ.
    #[must_use]
    pub fn has_differences(&self) -> bool {
        self.sheets.iter().any(|s| match &s.outcome {
            SheetOutcome::Compared { result } => result.has_differences(),
            SheetOutcome::OnlyInA { .. } | SheetOutcome::OnlyInB { .. } => true,
            SheetOutcome::Failed { .. } | SheetOutcome::Skipped => false,
        })
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.sheets
            .iter()
            .any(|s| matches!(s.outcome, SheetOutcome::Failed { .. }))
    }
}

impl DiffEngine {
    /// Compare every sheet of two datasets without progress reporting.
    pub fn compare_datasets(&self, a: &Dataset, b: &Dataset) -> Result<ComparisonRun> {
        self.compare_datasets_with(a, b, &NoProgress, None)
    }

    /// Compare every sheet of two datasets.
    ///
    /// `cancel` is checked before each sheet; once set, the remaining sheets are
    /// recorded as skipped and the run is marked cancelled.
    pub fn compare_datasets_with(
        &self,
        a: &Dataset,
        b: &Dataset,
        progress: &dyn ProgressSink,
        cancel: Option<&CancellationToken>,
    ) -> Result<ComparisonRun> {
        if a.is_empty() && b.is_empty() {
            return Err(SheetDiffError::compare(
                format!("comparing '{}' with '{}'", a.name(), b.name()),
                CompareErrorKind::NoSheets,
            ));
        }

        let mut sheets = Vec::with_capacity(a.sheet_count().max(b.sheet_count()));
        let mut cancelled = false;

        for (name, table_a) in a.sheets() {
            let Some(table_b) = b.sheet(name) else {
                tracing::info!(sheet = %name, "Sheet only present in {}", a.name());
                sheets.push(SheetReport {
                    name: name.to_string(),
                    outcome: SheetOutcome::OnlyInA {
                        shape: table_a.shape(),
                    },
                });
                continue;
            };

            if cancelled || cancel.is_some_and(CancellationToken::is_cancelled) {
                cancelled = true;
                sheets.push(SheetReport {
                    name: name.to_string(),
                    outcome: SheetOutcome::Skipped,
                });
                continue;
            }

            tracing::info!(
                sheet = %name,
                rows_a = table_a.row_count(),
                rows_b = table_b.row_count(),
                "Comparing sheet"
            );
            let outcome = match self.compare(name, table_a, table_b, progress) {
                Ok(result) => SheetOutcome::Compared {
                    result: Box::new(result),
                },
                Err(err) => {
                    tracing::warn!(sheet = %name, error = %err, "Sheet could not be compared");
                    SheetOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            sheets.push(SheetReport {
                name: name.to_string(),
                outcome,
            });
        }

        for (name, table_b) in b.sheets() {
            if a.sheet(name).is_none() {
                tracing::info!(sheet = %name, "Sheet only present in {}", b.name());
                sheets.push(SheetReport {
                    name: name.to_string(),
                    outcome: SheetOutcome::OnlyInB {
                        shape: table_b.shape(),
                    },
                });
            }
        }

        if cancelled {
            tracing::warn!("Comparison cancelled; remaining sheets skipped");
        }

        let (label_a, label_b) = side_labels(a.name(), b.name());
        Ok(ComparisonRun {
            label_a,
            label_b,
            identifiers: self.identifiers().clone(),
            sheets,
            cancelled,
        })
    }
}

/// Report labels for the two datasets.
///
/// Dataset names are used as-is unless they collide, in which case each gets
/// a side suffix so that per-side report columns stay distinct.
fn side_labels(name_a: &str, name_b: &str) -> (String, String) {
    if name_a == name_b {
        (format!("{name_a} (A)"), format!("{name_b} (B)"))
    } else {
        (name_a.to_string(), name_b.to_string())
    }
}
