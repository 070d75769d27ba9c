//! **Key-based diff of spreadsheets and tabular datasets.**
//!
//! `sheet-diff` compares two datasets (workbooks, CSV files or JSON documents) sheet by
//! sheet. Rows are matched by a composite key built from configurable identifier columns,
//! so reordering never shows up as a change. Every record is classified as identical,
//! modified (with per-column deltas) or present on one side only, and the result is
//! projected into report tables and accuracy statistics.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`CellValue`], [`Table`], [`Dataset`] and the [`IdentifierSpec`].
//! - **[`loaders`]**: reads JSON, CSV/TSV and (feature `xlsx`) spreadsheet workbooks.
//! - **[`matching`]**: composite record keys and the per-sheet key index.
//! - **[`diff`]**: the [`DiffEngine`], per-sheet results and whole-dataset runs.
//! - **[`stats`]**: match rate, data coverage and per-column accuracy.
//! - **[`reports`]**: report tables and the summary, JSON, Markdown and CSV writers.
//! - **[`pipeline`]**: load → compare → report stages used by the CLI.
//!
//! ## Comparing Two Datasets
//!
//! ```no_run
//! use std::path::Path;
//! use sheet_diff::{load_dataset, DiffEngine, IdentifierSpec, RunStats};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let a = load_dataset(Path::new("client.xlsx"))?;
//!     let b = load_dataset(Path::new("it.xlsx"))?;
//!
//!     let engine = DiffEngine::new(IdentifierSpec::default());
//!     let run = engine.compare_datasets(&a, &b)?;
//!     let stats = RunStats::from_run(&run);
//!
//!     println!("Modified records: {}", stats.modified);
//!     println!("Match rate: {:.2}%", stats.match_rate * 100.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `xlsx` (default): spreadsheet workbook input through `calamine`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Cast safety: usize↔f64 casts are pervasive in rate calculations
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod loaders;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod stats;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{BehaviorConfig, ComparisonConfig, IdentifierConfig, OutputConfig};
pub use config::{ConfigError, DiffConfig, Validatable};
pub use diff::{ComparisonRun, DiffEngine, DiffOptions, SheetComparisonResult};
pub use error::{ErrorContext, OptionContext, Result, SheetDiffError};
pub use loaders::{load_dataset, DatasetFormat, DatasetLoader};
pub use matching::{DuplicatePolicy, FallbackStrategy, RecordKey};
pub use model::{CellValue, Dataset, IdentifierSpec, Row, Table};
pub use reports::{ReportFormat, ReportGenerator, ReportModel};
pub use stats::{RunStats, SheetStats};
