//! JSON report generator.

use super::model::ReportTable;
use super::{model_for, ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{ComparisonRun, SheetReport};
use crate::model::IdentifierSpec;
use crate::stats::RunStats;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON report generator
pub struct JsonReporter {
    /// Whether to only include summary
    summary_only: bool,
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            summary_only: false,
            pretty: true,
        }
    }

    /// Create a summary-only reporter
    #[must_use]
    pub const fn summary_only() -> Self {
        Self {
            summary_only: true,
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_run_report(
        &self,
        run: &ComparisonRun,
        stats: &RunStats,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let model = (!self.summary_only).then(|| model_for(run, stats, config));

        let report = JsonRunReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: "sheet-diff".to_string(),
                    version: config.metadata.tool_version.clone(),
                },
                generated_at: Utc::now().to_rfc3339(),
                title: config.title.as_deref(),
                dataset_a: DatasetInfo {
                    label: &run.label_a,
                    file_path: config.metadata.path_a.as_deref(),
                },
                dataset_b: DatasetInfo {
                    label: &run.label_b,
                    file_path: config.metadata.path_b.as_deref(),
                },
                identifiers: &run.identifiers,
                cancelled: run.cancelled,
                custom: &config.metadata.custom,
            },
            has_differences: run.has_differences(),
            summary: stats,
            sheets: (!self.summary_only).then_some(run.sheets.as_slice()),
            tables: model.as_ref().map(|m| m.tables.as_slice()),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(|e| ReportError::SerializationError(e.to_string()))?;
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON report structures

#[derive(Serialize)]
struct JsonRunReport<'a> {
    metadata: JsonReportMetadata<'a>,
    has_differences: bool,
    summary: &'a RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheets: Option<&'a [SheetReport]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tables: Option<&'a [ReportTable]>,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    dataset_a: DatasetInfo<'a>,
    dataset_b: DatasetInfo<'a>,
    identifiers: &'a IdentifierSpec,
    cancelled: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct DatasetInfo<'a> {
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{CellValue, Dataset, Table};

    fn run() -> ComparisonRun {
        let mut a = Table::new(["Channel Name", "Value"]);
        a.push_values([CellValue::from("Zee TV"), CellValue::from(10.0)]);
        let mut b = Table::new(["Channel Name", "Value"]);
        b.push_values([CellValue::from("Zee TV"), CellValue::from(20.0)]);
        DiffEngine::default()
            .compare_datasets(
                &Dataset::new("client").with_sheet("Jan", a),
                &Dataset::new("it").with_sheet("Jan", b),
            )
            .unwrap()
    }

    #[test]
    fn test_full_report() {
        let run = run();
        let stats = RunStats::from_run(&run);
        let mut config = ReportConfig::default();
        config.metadata.path_a = Some("data/client.json".to_string());

        let out = JsonReporter::new()
            .generate_run_report(&run, &stats, &config)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["metadata"]["tool"]["name"], "sheet-diff");
        assert_eq!(json["metadata"]["dataset_a"]["file_path"], "data/client.json");
        assert!(json["metadata"]["dataset_b"].get("file_path").is_none());
        assert_eq!(json["metadata"]["identifiers"][0], "Channel Name");
        assert_eq!(json["has_differences"], true);
        assert_eq!(json["summary"]["modified"], 1);
        assert_eq!(json["sheets"][0]["status"], "compared");
        assert_eq!(json["sheets"][0]["result"]["records"][0]["kind"], "modified");
        assert_eq!(
            json["sheets"][0]["result"]["records"][0]["deltas"][0]["b"],
            20.0
        );
        assert_eq!(json["tables"][0]["name"], "Summary");
    }

    #[test]
    fn test_summary_only() {
        let run = run();
        let stats = RunStats::from_run(&run);
        let out = JsonReporter::summary_only()
            .pretty(false)
            .generate_run_report(&run, &stats, &ReportConfig::default())
            .unwrap();
        assert!(!out.contains('\n'));

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json.get("sheets").is_none());
        assert!(json.get("tables").is_none());
        assert_eq!(json["summary"]["sheets_compared"], 1);
    }
}
