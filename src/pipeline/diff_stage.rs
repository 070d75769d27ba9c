//! Diff computation stage.
//!
//! Builds the engine from the configuration and compares the two datasets.

use crate::config::DiffConfig;
use crate::diff::{CancellationToken, ComparisonRun, DiffEngine, ProgressSink};
use crate::model::Dataset;
use anyhow::Result;

use super::PipelineError;

/// Run the comparison between two datasets.
pub fn compute_diff(
    config: &DiffConfig,
    a: &Dataset,
    b: &Dataset,
    progress: &dyn ProgressSink,
    cancel: Option<&CancellationToken>,
) -> Result<ComparisonRun> {
    let quiet = config.behavior.quiet;
    let options = config.comparison.diff_options();

    if !quiet {
        tracing::info!(
            identifiers = %config.identifiers,
            fallback = %options.fallback,
            duplicates = %options.duplicate_policy,
            "Comparing {} with {}",
            a.name(),
            b.name()
        );
    }

    let engine = DiffEngine::new(config.identifiers.clone()).with_options(options);
    let run = engine
        .compare_datasets_with(a, b, progress, cancel)
        .map_err(|e| PipelineError::DiffFailed { source: e.into() })?;

    if !quiet {
        let compared = run.compared().count();
        let differing = run.compared().filter(|r| r.has_differences()).count();
        tracing::info!(
            "Diff complete: {compared} sheet(s) compared, {differing} with differences"
        );
    }
    if run.cancelled {
        tracing::warn!("Comparison cancelled; remaining sheets were skipped");
    }
    for name in run.sheets_with_status("FAILED") {
        tracing::warn!(sheet = %name, "Sheet could not be compared");
    }

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DiffPaths};
    use crate::diff::NoProgress;
    use crate::model::{CellValue, Table};
    use std::path::PathBuf;

    fn config() -> DiffConfig {
        let app = AppConfig::builder().identifiers(["id"]).quiet(true).build();
        let paths = DiffPaths {
            a: PathBuf::from("a.json"),
            b: PathBuf::from("b.json"),
        };
        DiffConfig::from_app(paths, app).unwrap()
    }

    #[test]
    fn test_compute_diff() {
        let mut t1 = Table::new(["id", "v"]);
        t1.push_values([CellValue::from("x"), CellValue::from(1.0)]);
        let mut t2 = Table::new(["id", "v"]);
        t2.push_values([CellValue::from("x"), CellValue::from(2.0)]);

        let a = Dataset::new("a").with_sheet("S", t1);
        let b = Dataset::new("b").with_sheet("S", t2);
        let run = compute_diff(&config(), &a, &b, &NoProgress, None).unwrap();
        assert!(run.has_differences());
        assert_eq!(run.compared().count(), 1);
    }

    #[test]
    fn test_empty_datasets_fail() {
        let err = compute_diff(
            &config(),
            &Dataset::new("a"),
            &Dataset::new("b"),
            &NoProgress,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Diff failed: "));
    }
}
