use sheet_diff::reports::{create_reporter_with_options, ReportConfig};
use sheet_diff::{load_dataset, DiffEngine, IdentifierSpec, ReportFormat, RunStats};
use std::path::Path;

fn fixture_run() -> (sheet_diff::ComparisonRun, RunStats) {
    let client = load_dataset(Path::new("tests/fixtures/client.json"))
        .expect("failed to load client fixture");
    let it = load_dataset(Path::new("tests/fixtures/it.json")).expect("failed to load it fixture");

    let run = DiffEngine::new(IdentifierSpec::default())
        .compare_datasets(&client, &it)
        .expect("comparison should succeed");
    let stats = RunStats::from_run(&run);
    (run, stats)
}

fn render(format: ReportFormat) -> String {
    let (run, stats) = fixture_run();
    create_reporter_with_options(format, false)
        .generate_run_report(&run, &stats, &ReportConfig::default())
        .expect("report should render")
}

/// Lines of one `# <table>` section of a CSV report, header included.
fn csv_section<'a>(report: &'a str, table: &str) -> Vec<&'a str> {
    let marker = format!("# {table}");
    report
        .lines()
        .skip_while(|l| *l != marker)
        .skip(1)
        .take_while(|l| !l.is_empty())
        .collect()
}

#[test]
fn golden_load_client_fixture() {
    let client = load_dataset(Path::new("tests/fixtures/client.json"))
        .expect("failed to load client fixture");

    // January: 3 rows x 6 columns (Notes only exists here)
    // February: 1 row x 4 columns
    assert_eq!(client.sheet_count(), 2);
    assert_eq!(client.sheet("January").map(|t| t.row_count()), Some(3));
    assert_eq!(client.sheet("January").map(|t| t.column_count()), Some(6));
    assert_eq!(client.sheet("February").map(|t| t.row_count()), Some(1));
}

#[test]
fn golden_diff_fixture_pair() {
    let (run, stats) = fixture_run();

    // January: Star Plus identical, Zee TV 10 -> 20, Sony only in A, Colors only in B
    // February: Zee TV identical across date and time formats
    // March: only in B
    assert_eq!(stats.identical, 2);
    assert_eq!(stats.modified, 1);
    assert_eq!(stats.only_in_a, 1);
    assert_eq!(stats.only_in_b, 1);
    assert_eq!(stats.sheets_only_in_b, 1);
    assert_eq!(run.sheets_with_status("ONLY_IN_B").collect::<Vec<_>>(), vec!["March"]);
}

#[test]
fn golden_csv_modifications_table() {
    let report = render(ReportFormat::Csv);
    let section = csv_section(&report, "All_Modifications");

    assert_eq!(
        section,
        vec![
            "Sheet Name,Composite Key,Channel Name,Program Date,Clip Start Time,\
             client.json Row #,it.json Row #,Column,client.json Value,it.json Value",
            "January,Zee TV|2024-01-15|10:00:00,Zee TV,2024-01-15,10:00:00,1,2,Value,10,20",
        ]
    );
}

#[test]
fn golden_csv_report_sections() {
    let report = render(ReportFormat::Csv);
    let sections: Vec<&str> = report
        .lines()
        .filter_map(|l| l.strip_prefix("# "))
        .collect();

    assert_eq!(
        sections,
        vec![
            "Summary",
            "All_Modifications",
            "Identifier_Analysis",
            "Only_A",
            "Only_B",
            "Details_January",
            "Details_February",
        ]
    );
    // Sheet rows plus the TOTAL row
    assert_eq!(csv_section(&report, "Summary").len(), 5);
}

#[test]
fn golden_json_summary() {
    let report = render(ReportFormat::Json);
    let json: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");

    assert_eq!(json["summary"]["sheets_total"], 3);
    assert_eq!(json["summary"]["sheets_compared"], 2);
    assert_eq!(json["summary"]["identical"], 2);
    assert_eq!(json["summary"]["modified"], 1);
    assert_eq!(json["summary"]["data_coverage"], 0.6);
}

#[test]
fn golden_summary_mentions_change() {
    let report = render(ReportFormat::Summary);

    assert!(report.contains("January"));
    assert!(report.contains("Zee TV"));
    assert!(report.contains("March"));
}
