//! Pipeline orchestration for dataset comparisons.
//!
//! This module provides the load → compare → report stages shared by the
//! CLI command handlers.

mod diff_stage;
mod load;
mod output;
mod report_stage;

pub use diff_stage::compute_diff;
pub use load::{align_single_sheets, load_dataset_with_context, select_sheets};
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::output_report;

use crate::diff::ComparisonRun;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse a dataset
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Comparison failed as a whole
    #[error("Diff failed: {source}")]
    DiffFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Success - no differences, or differences without --fail-on-diff
    pub const SUCCESS: i32 = 0;
    /// Differences were found and --fail-on-diff was set
    pub const DIFFERENCES: i32 = 1;
    /// One or more sheets could not be compared
    pub const SHEET_FAILURES: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Exit code for a finished run.
///
/// Failed sheets take precedence over differences.
#[must_use]
pub fn exit_code_for(run: &ComparisonRun, fail_on_diff: bool) -> i32 {
    if run.has_failures() {
        exit_codes::SHEET_FAILURES
    } else if fail_on_diff && run.has_differences() {
        exit_codes::DIFFERENCES
    } else {
        exit_codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{CellValue, Dataset, IdentifierSpec, Table};

    fn compare(b_value: f64, b_columns: &[&str]) -> ComparisonRun {
        let mut ta = Table::new(["id", "v"]);
        ta.push_values([CellValue::from("x"), CellValue::from(1.0)]);
        let mut tb = Table::new(b_columns.iter().copied());
        if !b_columns.is_empty() {
            tb.push_values([CellValue::from("x"), CellValue::from(b_value)]);
        }
        DiffEngine::new(IdentifierSpec::new(["id"]).unwrap())
            .compare_datasets(
                &Dataset::new("a").with_sheet("S", ta),
                &Dataset::new("b").with_sheet("S", tb),
            )
            .unwrap()
    }

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::DIFFERENCES, 1);
        assert_eq!(exit_codes::SHEET_FAILURES, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_exit_code_for_run() {
        let same = compare(1.0, &["id", "v"]);
        assert_eq!(exit_code_for(&same, true), exit_codes::SUCCESS);

        let changed = compare(2.0, &["id", "v"]);
        assert_eq!(exit_code_for(&changed, false), exit_codes::SUCCESS);
        assert_eq!(exit_code_for(&changed, true), exit_codes::DIFFERENCES);

        let failed = compare(0.0, &[]);
        assert!(failed.has_failures());
        assert_eq!(exit_code_for(&failed, true), exit_codes::SHEET_FAILURES);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::LoadFailed {
            path: "a.csv".to_string(),
            source: anyhow::anyhow!("missing header"),
        };
        assert_eq!(err.to_string(), "Load failed for a.csv: missing header");
    }
}
