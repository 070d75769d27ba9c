//! Key-based diff engine for tabular data.
//!
//! Records are matched by a composite key built from identifier columns, so
//! reordering rows never shows up as a difference. For every key the engine
//! decides whether the record is identical, modified (with per-column deltas),
//! or present on one side only.
//!
//! # Architecture
//!
//! - [`DiffEngine::compare`]: one sheet against another
//! - [`DiffEngine::compare_datasets`]: every sheet of two datasets, with per-sheet
//!   failure isolation and optional cancellation
//! - [`ProgressSink`]: observer for per-key progress; [`NoProgress`] by default
//!
//! # Example
//!
//! ```
//! use sheet_diff::diff::DiffEngine;
//! use sheet_diff::model::{CellValue, Dataset, IdentifierSpec, Table};
//!
//! let mut jan = Table::new(["Channel Name", "Value"]);
//! jan.push_values([CellValue::from("Zee TV"), CellValue::from(10.0)]);
//! let a = Dataset::new("client.xlsx").with_sheet("Jan", jan.clone());
//! let b = Dataset::new("it.xlsx").with_sheet("Jan", jan);
//!
//! let engine = DiffEngine::new(IdentifierSpec::default());
//! let run = engine.compare_datasets(&a, &b)?;
//! assert!(!run.has_differences());
//! # Ok::<(), sheet_diff::SheetDiffError>(())
//! ```

mod engine;
mod engine_config;
mod progress;
mod result;
mod run;

pub use engine::{diff_rows, DiffEngine};
pub use engine_config::DiffOptions;
pub use progress::{CancellationToken, NoProgress, ProgressEvent, ProgressFn, ProgressSink};
pub use result::{
    ColumnDelta, ColumnOverlap, ComparisonWarning, DiffRecord, IdentifierAvailability,
    RecordCounts, RecordKind, SheetComparisonResult,
};
pub use run::{ComparisonRun, SheetOutcome, SheetReport};
