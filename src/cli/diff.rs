//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two datasets.

use super::progress::TerminalProgress;
use crate::config::DiffConfig;
use crate::diff::{NoProgress, ProgressSink};
use crate::pipeline::{
    align_single_sheets, compute_diff, exit_code_for, load_dataset_with_context, output_report,
    select_sheets,
};
use anyhow::Result;

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    let mut a = load_dataset_with_context(&config.paths.a, quiet)?;
    let mut b = load_dataset_with_context(&config.paths.b, quiet)?;
    align_single_sheets(&a, &mut b);
    select_sheets(&mut a, &mut b, &config.comparison.sheets);

    let terminal = TerminalProgress::new();
    let progress: &dyn ProgressSink =
        if config.behavior.no_progress || quiet || !TerminalProgress::is_supported() {
            &NoProgress
        } else {
            &terminal
        };

    let run = compute_diff(&config, &a, &b, progress, None)?;
    let stats = output_report(&config, &run)?;

    if !quiet {
        tracing::info!(
            "{} difference(s) across {} sheet(s)",
            stats.total_differences(),
            stats.sheets_with_differences
        );
    }

    Ok(exit_code_for(&run, config.behavior.fail_on_diff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DiffPaths};
    use crate::pipeline::exit_codes;
    use crate::reports::ReportFormat;

    #[test]
    fn test_run_diff_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "id,v\nx,1\ny,2\n").unwrap();
        std::fs::write(&b, "id,v\ny,2\nx,3\n").unwrap();

        let app = AppConfig::builder()
            .identifiers(["id"])
            .output_format(ReportFormat::Json)
            .output_file(Some(dir.path().join("out.json")))
            .quiet(true)
            .fail_on_diff(true)
            .build();
        let config = DiffConfig::from_app(DiffPaths { a, b }, app).unwrap();
        assert_eq!(run_diff(config).unwrap(), exit_codes::DIFFERENCES);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(report["summary"]["modified"], 1);
        assert_eq!(report["summary"]["identical"], 1);
    }
}
