//! Sheets command handler.
//!
//! Implements the `sheets` subcommand: lists the sheets of one dataset with
//! their shape and which identifier columns each one carries.

use crate::matching::available_identifiers;
use crate::model::{Dataset, IdentifierSpec};
use crate::pipeline::{load_dataset_with_context, write_output, OutputTarget};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Shape and identifier coverage of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetInfo {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub identifiers: Vec<String>,
    pub missing_identifiers: Vec<String>,
}

/// Describe every sheet of `dataset`, in workbook order.
#[must_use]
pub fn describe_sheets(dataset: &Dataset, identifiers: &IdentifierSpec) -> Vec<SheetInfo> {
    dataset
        .sheets()
        .map(|(name, table)| {
            let present = available_identifiers(identifiers, table.columns());
            let missing = identifiers
                .iter()
                .filter(|id| !present.iter().any(|p| p == id))
                .map(str::to_string)
                .collect();
            SheetInfo {
                name: name.to_string(),
                rows: table.row_count(),
                columns: table.column_count(),
                identifiers: present,
                missing_identifiers: missing,
            }
        })
        .collect()
}

fn render_text(label: &str, sheets: &[SheetInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{label}: {} sheet(s)", sheets.len());
    let width = sheets.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for sheet in sheets {
        let ids = if sheet.identifiers.is_empty() {
            "no identifiers".to_string()
        } else {
            sheet.identifiers.join(", ")
        };
        let _ = writeln!(
            out,
            "  {:width$}  {:>7} rows  {:>3} cols  {ids}",
            sheet.name, sheet.rows, sheet.columns
        );
    }
    out
}

/// Run the sheets command.
pub fn run_sheets(path: &Path, identifiers: &IdentifierSpec, json: bool, quiet: bool) -> Result<()> {
    let dataset = load_dataset_with_context(path, quiet)?;
    let sheets = describe_sheets(&dataset, identifiers);

    let content = if json {
        serde_json::to_string_pretty(&sheets).context("Failed to serialize sheet list")?
    } else {
        render_text(dataset.name(), &sheets)
    };
    write_output(&content, &OutputTarget::Stdout, quiet)
}
