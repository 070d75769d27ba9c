//! Pipeline and CLI integration tests.
//!
//! These tests exercise the full load → diff → report pipeline,
//! error handling paths, and CLI command handlers with real fixture files.

use sheet_diff::cli::{describe_sheets, run_diff};
use sheet_diff::config::{AppConfig, ConfigPreset, DiffConfig, DiffPaths, Validatable};
use sheet_diff::diff::NoProgress;
use sheet_diff::pipeline::{
    align_single_sheets, compute_diff, exit_codes, load_dataset_with_context, output_report,
    select_sheets, write_output, OutputTarget, PipelineError,
};
use sheet_diff::reports::ReportFormat;
use sheet_diff::IdentifierSpec;
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn diff_config(a: &str, b: &str, app: AppConfig) -> DiffConfig {
    DiffConfig::from_app(
        DiffPaths {
            a: fixture_path(a),
            b: fixture_path(b),
        },
        app,
    )
    .expect("identifiers should be valid")
}

// ============================================================================
// Pipeline Load Stage Tests
// ============================================================================

mod load_stage {
    use super::*;

    #[test]
    fn load_json_fixture() {
        let dataset = load_dataset_with_context(&fixture_path("client.json"), true)
            .expect("load should succeed");
        assert_eq!(dataset.sheet_count(), 2);
    }

    #[test]
    fn load_missing_file_is_load_failed() {
        let err = load_dataset_with_context(&fixture_path("missing.json"), true).unwrap_err();
        let pipeline = err
            .downcast_ref::<PipelineError>()
            .expect("should be a pipeline error");
        assert!(matches!(pipeline, PipelineError::LoadFailed { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn load_malformed_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"sheets\": [").unwrap();
        assert!(load_dataset_with_context(&path, true).is_err());
    }

    #[test]
    fn select_sheets_narrows_both_sides() {
        let mut a = load_dataset_with_context(&fixture_path("client.json"), true).unwrap();
        let mut b = load_dataset_with_context(&fixture_path("it.json"), true).unwrap();
        select_sheets(&mut a, &mut b, &["February".to_string(), "Nope".to_string()]);

        assert_eq!(a.sheet_names().collect::<Vec<_>>(), vec!["February"]);
        assert_eq!(b.sheet_names().collect::<Vec<_>>(), vec!["February"]);
    }

    #[test]
    fn single_csv_files_are_paired() {
        let a = load_dataset_with_context(&fixture_path("no_identifiers_a.csv"), true).unwrap();
        let mut b = load_dataset_with_context(&fixture_path("no_identifiers_b.csv"), true).unwrap();
        align_single_sheets(&a, &mut b);
        assert_eq!(b.sheet_names().collect::<Vec<_>>(), vec!["no_identifiers_a"]);
    }

    #[test]
    fn multi_sheet_datasets_are_not_renamed() {
        let a = load_dataset_with_context(&fixture_path("client.json"), true).unwrap();
        let mut b = load_dataset_with_context(&fixture_path("duplicates.csv"), true).unwrap();
        align_single_sheets(&a, &mut b);
        assert_eq!(b.sheet_names().collect::<Vec<_>>(), vec!["duplicates"]);
    }
}

// ============================================================================
// Pipeline Diff and Report Stage Tests
// ============================================================================

mod diff_stage {
    use super::*;

    #[test]
    fn compute_diff_on_fixtures() {
        let config = diff_config("client.json", "it.json", AppConfig::default());
        let a = load_dataset_with_context(&config.paths.a, true).unwrap();
        let b = load_dataset_with_context(&config.paths.b, true).unwrap();

        let run = compute_diff(&config, &a, &b, &NoProgress, None).expect("diff should succeed");
        assert_eq!(run.label_a, "client.json");
        assert_eq!(run.label_b, "it.json");
        assert!(run.has_differences());
    }

    #[test]
    fn cancelled_run_skips_sheets() {
        let config = diff_config("client.json", "it.json", AppConfig::default());
        let a = load_dataset_with_context(&config.paths.a, true).unwrap();
        let b = load_dataset_with_context(&config.paths.b, true).unwrap();

        let token = sheet_diff::diff::CancellationToken::new();
        token.cancel();
        let run = compute_diff(&config, &a, &b, &NoProgress, Some(&token)).unwrap();
        assert!(run.cancelled);
        assert_eq!(run.sheets_with_status("SKIPPED").count(), 2);
        assert_eq!(run.compared().count(), 0);
    }

    #[test]
    fn output_report_writes_file_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.md");
        let tables = dir.path().join("tables");
        let app = AppConfig::builder()
            .output_format(ReportFormat::Markdown)
            .output_file(Some(out.clone()))
            .output_dir(Some(tables.clone()))
            .quiet(true)
            .build();
        let config = diff_config("client.json", "it.json", app);
        let a = load_dataset_with_context(&config.paths.a, true).unwrap();
        let b = load_dataset_with_context(&config.paths.b, true).unwrap();
        let run = compute_diff(&config, &a, &b, &NoProgress, None).unwrap();

        let stats = output_report(&config, &run).expect("report should succeed");
        assert_eq!(stats.modified, 1);

        let markdown = std::fs::read_to_string(&out).unwrap();
        assert!(markdown.contains("January"));
        assert!(tables.join("Summary.csv").is_file());
        assert!(tables.join("All_Modifications.csv").is_file());
    }

    #[test]
    fn write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output("hello", &OutputTarget::File(path.clone()), true).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}

// ============================================================================
// CLI Handler Tests
// ============================================================================

mod cli_handlers {
    use super::*;

    fn json_app(dir: &Path) -> sheet_diff::AppConfigBuilder {
        AppConfig::builder()
            .output_format(ReportFormat::Json)
            .output_file(Some(dir.join("report.json")))
            .quiet(true)
    }

    #[test]
    fn run_diff_identical_files_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let config = diff_config(
            "client.json",
            "client.json",
            json_app(dir.path()).fail_on_diff(true).build(),
        );
        assert_eq!(run_diff(config).unwrap(), exit_codes::SUCCESS);
    }

    #[test]
    fn run_diff_reports_differences_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let lenient = diff_config("client.json", "it.json", json_app(dir.path()).build());
        assert_eq!(run_diff(lenient).unwrap(), exit_codes::SUCCESS);

        let failing = diff_config(
            "client.json",
            "it.json",
            json_app(dir.path()).fail_on_diff(true).build(),
        );
        assert_eq!(run_diff(failing).unwrap(), exit_codes::DIFFERENCES);
    }

    #[test]
    fn run_diff_sheet_failure_wins_over_differences() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppConfig {
            comparison: AppConfig::from_preset(ConfigPreset::Strict).comparison,
            ..json_app(dir.path()).fail_on_diff(true).build()
        };
        let config = diff_config("no_identifiers_a.csv", "no_identifiers_b.csv", app);
        assert_eq!(run_diff(config).unwrap(), exit_codes::SHEET_FAILURES);

        let report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["summary"]["sheets_failed"], 1);
    }

    #[test]
    fn run_diff_single_csv_files_use_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = diff_config(
            "no_identifiers_a.csv",
            "no_identifiers_b.csv",
            json_app(dir.path()).build(),
        );
        assert_eq!(run_diff(config).unwrap(), exit_codes::SUCCESS);

        let report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["summary"]["identical"], 2);
        assert_eq!(report["summary"]["only_in_b"], 1);
    }

    #[test]
    fn run_diff_missing_input_is_error() {
        let config = diff_config("missing_a.json", "it.json", AppConfig::default());
        assert!(run_diff(config).is_err());
    }

    #[test]
    fn describe_fixture_sheets() {
        let dataset = load_dataset_with_context(&fixture_path("it.json"), true).unwrap();
        let infos = describe_sheets(&dataset, &IdentifierSpec::default());

        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].name, "January");
        assert_eq!(infos[0].identifiers.len(), 3);
        assert_eq!(infos[2].name, "March");
        assert_eq!(
            infos[2].missing_identifiers,
            vec!["Program Date".to_string(), "Clip Start Time".to_string()]
        );
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn presets_validate() {
        for preset in ConfigPreset::all() {
            assert!(
                AppConfig::from_preset(*preset).validate().is_empty(),
                "{preset} is invalid"
            );
        }
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".sheet-diff.yaml");
        std::fs::write(
            &path,
            "identifiers:\n  columns: [Channel Name]\ncomparison:\n  abs_tolerance: 0.5\n",
        )
        .unwrap();

        let app = sheet_diff::config::load_config_file(&path).unwrap();
        assert_eq!(app.identifiers.columns, vec!["Channel Name".to_string()]);
        assert!((app.comparison.abs_tolerance - 0.5).abs() < f64::EPSILON);
        assert_eq!(app.output, AppConfig::default().output);
    }

    #[test]
    fn negative_tolerance_is_invalid() {
        let app = AppConfig::builder().tolerance(-1.0, 0.0).build();
        let errors = app.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "comparison.abs_tolerance");
    }
}
