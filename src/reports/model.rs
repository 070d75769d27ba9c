//! Format-neutral report model.
//!
//! A comparison run is projected into a fixed set of named tables. Writers
//! only render these tables; none of them re-derives anything from the run.
//!
//! | table | content |
//! |---|---|
//! | `Summary` | one row per sheet plus a `TOTAL` row |
//! | `All_Modifications` | one row per changed column, all sheets |
//! | `Identifier_Analysis` | identifier availability and data-quality findings |
//! | `Only_A` / `Only_B` | full rows present on one side only |
//! | `Details_<sheet>` | every record of one sheet with its classification |

use crate::diff::{
    ComparisonRun, DiffRecord, RecordKind, SheetComparisonResult, SheetOutcome,
};
use crate::matching::KeyStrategy;
use crate::model::{cell, CellValue, Row, Side};
use crate::stats::{RunStats, SheetStats};
use serde::{Deserialize, Serialize};

pub const SUMMARY_TABLE: &str = "Summary";
pub const MODIFICATIONS_TABLE: &str = "All_Modifications";
pub const IDENTIFIER_TABLE: &str = "Identifier_Analysis";
pub const ONLY_A_TABLE: &str = "Only_A";
pub const ONLY_B_TABLE: &str = "Only_B";
pub const DETAILS_PREFIX: &str = "Details_";

/// Label used for one-sided records in the column field of detail tables.
pub const ALL_COLUMNS: &str = "ALL_COLUMNS";

/// One named table of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` in row `row`.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The projected report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub label_a: String,
    pub label_b: String,
    pub tables: Vec<ReportTable>,
}

impl ReportModel {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

/// Options for [`project_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Emit identical records in the detail tables
    pub include_identical: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            include_identical: true,
        }
    }
}

/// Project a run with default options.
#[must_use]
pub fn project(run: &ComparisonRun) -> ReportModel {
    project_with(run, &RunStats::from_run(run), ProjectionOptions::default())
}

/// Project a run using precomputed statistics.
#[must_use]
pub fn project_with(
    run: &ComparisonRun,
    stats: &RunStats,
    options: ProjectionOptions,
) -> ReportModel {
    let projector = Projector {
        run,
        stats,
        la: run.label(Side::A),
        lb: run.label(Side::B),
    };

    let mut tables = vec![
        projector.summary(),
        projector.modifications(),
        projector.identifier_analysis(),
        projector.one_sided(Side::A),
        projector.one_sided(Side::B),
    ];
    tables.extend(run.compared().map(|r| projector.details(r, options)));

    ReportModel {
        label_a: run.label_a.clone(),
        label_b: run.label_b.clone(),
        tables,
    }
}

struct Projector<'r> {
    run: &'r ComparisonRun,
    stats: &'r RunStats,
    la: &'r str,
    lb: &'r str,
}

fn n(value: usize) -> CellValue {
    CellValue::Number(value as f64)
}

/// Rate as a percentage rounded to two decimals.
fn pct(rate: f64) -> CellValue {
    CellValue::Number((rate * 10_000.0).round() / 100.0)
}

fn text(value: impl Into<String>) -> CellValue {
    CellValue::Text(value.into())
}

/// 1-based data row number.
fn row_number(position: Option<usize>) -> CellValue {
    position.map_or(CellValue::Empty, |p| n(p + 1))
}

fn yes_no(flag: bool) -> CellValue {
    text(if flag { "Yes" } else { "No" })
}

/// Compact `column=value; ...` rendering of a whole row.
fn render_row(row: &Row) -> String {
    row.iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn strategy_label(strategy: &KeyStrategy) -> &'static str {
    match strategy {
        KeyStrategy::Identifiers { .. } => "identifiers",
        KeyStrategy::ContentHash { .. } => "content-hash",
        KeyStrategy::RowPosition => "row-position",
    }
}

impl Projector<'_> {
    fn sheet_stats(&self, name: &str) -> Option<&SheetStats> {
        self.stats.sheets.iter().find(|s| s.sheet_name == name)
    }

    /// Identifier values of a record, aligned with the configured identifiers.
    fn identifier_cells(&self, result: &SheetComparisonResult, record: &DiffRecord) -> Vec<CellValue> {
        let parts = &record.key().parts;
        self.run
            .identifiers
            .iter()
            .map(|id| {
                result
                    .identifiers
                    .used
                    .iter()
                    .position(|u| u == id)
                    .and_then(|i| parts.get(i))
                    .map_or(CellValue::Empty, |p| text(p.clone()))
            })
            .collect()
    }

    fn identifier_headers(&self) -> impl Iterator<Item = String> + '_ {
        self.run.identifiers.iter().map(str::to_string)
    }

    fn summary(&self) -> ReportTable {
        let (la, lb) = (self.la, self.lb);
        let mut table = ReportTable::new(
            SUMMARY_TABLE,
            vec![
                "Sheet Name".to_string(),
                "Status".to_string(),
                format!("{la} Rows"),
                format!("{lb} Rows"),
                "Identical Rows".to_string(),
                "Modified Rows".to_string(),
                format!("Only in {la}"),
                format!("Only in {lb}"),
                "Common Columns".to_string(),
                format!("Columns Only in {la}"),
                format!("Columns Only in {lb}"),
                "Match Rate (%)".to_string(),
                "Data Coverage (%)".to_string(),
                "Available Identifiers".to_string(),
                "Missing Identifiers".to_string(),
                "Fallback Keying".to_string(),
                format!("Duplicate Keys {la}"),
                format!("Duplicate Keys {lb}"),
                "Notes".to_string(),
            ],
        );

        for report in &self.run.sheets {
            let status = text(report.outcome.label());
            let name = text(report.name.clone());
            let row = match &report.outcome {
                SheetOutcome::Compared { result } => {
                    let Some(s) = self.sheet_stats(&report.name) else {
                        continue;
                    };
                    vec![
                        name,
                        status,
                        n(s.total_a),
                        n(s.total_b),
                        n(s.identical),
                        n(s.modified),
                        n(s.only_in_a),
                        n(s.only_in_b),
                        n(s.common_columns),
                        n(s.unique_columns_a),
                        n(s.unique_columns_b),
                        pct(s.match_rate),
                        pct(s.data_coverage),
                        n(result.identifiers.used.len()),
                        n(result.identifiers.missing.len()),
                        yes_no(s.identifiers_missing),
                        n(s.duplicate_keys_a),
                        n(s.duplicate_keys_b),
                        text(if result.warnings.is_empty() {
                            String::new()
                        } else {
                            format!("{} warning(s)", result.warnings.len())
                        }),
                    ]
                }
                SheetOutcome::Failed { reason } => {
                    let mut row = vec![name, status];
                    row.resize(18, CellValue::Empty);
                    row.push(text(reason.clone()));
                    row
                }
                SheetOutcome::OnlyInA { shape } => {
                    let mut row = vec![name, status, n(shape.rows)];
                    row.resize(18, CellValue::Empty);
                    row.push(text(format!("Sheet only present in {la}")));
                    row
                }
                SheetOutcome::OnlyInB { shape } => {
                    let mut row = vec![name, status, CellValue::Empty, n(shape.rows)];
                    row.resize(18, CellValue::Empty);
                    row.push(text(format!("Sheet only present in {lb}")));
                    row
                }
                SheetOutcome::Skipped => {
                    let mut row = vec![name, status];
                    row.resize(18, CellValue::Empty);
                    row.push(text("Comparison cancelled"));
                    row
                }
            };
            table.push_row(row);
        }

        let t = self.stats;
        let mut total = vec![
            text("TOTAL"),
            text(format!("{} compared", t.sheets_compared)),
            n(t.total_a),
            n(t.total_b),
            n(t.identical),
            n(t.modified),
            n(t.only_in_a),
            n(t.only_in_b),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
            pct(t.match_rate),
            pct(t.data_coverage),
        ];
        total.resize(18, CellValue::Empty);
        total.push(text(format!(
            "{} sheet(s) with differences",
            t.sheets_with_differences
        )));
        table.push_row(total);
        table
    }

    fn modifications(&self) -> ReportTable {
        let (la, lb) = (self.la, self.lb);
        let mut columns = vec!["Sheet Name".to_string(), "Composite Key".to_string()];
        columns.extend(self.identifier_headers());
        columns.extend([
            format!("{la} Row #"),
            format!("{lb} Row #"),
            "Column".to_string(),
            format!("{la} Value"),
            format!("{lb} Value"),
        ]);
        let mut table = ReportTable::new(MODIFICATIONS_TABLE, columns);

        for result in self.run.compared() {
            for record in result.records_of(RecordKind::Modified) {
                let (pa, pb) = record.positions();
                for delta in record.deltas() {
                    let mut row = vec![
                        text(result.sheet_name.clone()),
                        text(record.key().value.clone()),
                    ];
                    row.extend(self.identifier_cells(result, record));
                    row.extend([
                        row_number(pa),
                        row_number(pb),
                        text(delta.column.clone()),
                        delta.a.clone(),
                        delta.b.clone(),
                    ]);
                    table.push_row(row);
                }
            }
        }
        table
    }

    fn identifier_analysis(&self) -> ReportTable {
        let (la, lb) = (self.la, self.lb);
        let mut table = ReportTable::new(
            IDENTIFIER_TABLE,
            vec![
                "Sheet Name".to_string(),
                "Key Strategy".to_string(),
                "Configured Identifiers".to_string(),
                format!("Available in {la}"),
                format!("Available in {lb}"),
                "Used Identifiers".to_string(),
                "Missing Identifiers".to_string(),
                format!("Unique Keys Only in {la}"),
                format!("Unique Keys Only in {lb}"),
                format!("Duplicate Keys {la}"),
                format!("Duplicate Keys {lb}"),
                "Malformed Values".to_string(),
                "Warnings".to_string(),
            ],
        );

        for result in self.run.compared() {
            let ids = &result.identifiers;
            let counts = result.counts();
            let warnings = result
                .warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            table.push_row(vec![
                text(result.sheet_name.clone()),
                text(strategy_label(&ids.strategy)),
                text(ids.configured.join(", ")),
                text(ids.available_a.join(", ")),
                text(ids.available_b.join(", ")),
                text(ids.used.join(", ")),
                text(ids.missing.join(", ")),
                n(counts.only_in_a),
                n(counts.only_in_b),
                n(result.duplicate_keys(Side::A).count()),
                n(result.duplicate_keys(Side::B).count()),
                n(result.malformed_values()),
                text(warnings),
            ]);
        }
        table
    }

    fn one_sided(&self, side: Side) -> ReportTable {
        let (kind, name, label) = match side {
            Side::A => (RecordKind::OnlyInA, ONLY_A_TABLE, self.la),
            Side::B => (RecordKind::OnlyInB, ONLY_B_TABLE, self.lb),
        };

        // Column set is the union of every one-sided row, in encounter order
        let mut data_columns: Vec<String> = Vec::new();
        for result in self.run.compared() {
            for record in result.records_of(kind) {
                if let Some(row) = record.row() {
                    for column in row.keys() {
                        if !data_columns.contains(column) {
                            data_columns.push(column.clone());
                        }
                    }
                }
            }
        }

        let mut columns = vec!["Sheet Name".to_string(), "Composite Key".to_string()];
        columns.push(format!("{label} Row #"));
        columns.extend(data_columns.iter().cloned());
        let mut table = ReportTable::new(name, columns);

        for result in self.run.compared() {
            for record in result.records_of(kind) {
                let (pa, pb) = record.positions();
                let mut row = vec![
                    text(result.sheet_name.clone()),
                    text(record.key().value.clone()),
                    row_number(pa.or(pb)),
                ];
                if let Some(source) = record.row() {
                    row.extend(data_columns.iter().map(|c| cell(source, c).clone()));
                }
                table.push_row(row);
            }
        }
        table
    }

    fn details(&self, result: &SheetComparisonResult, options: ProjectionOptions) -> ReportTable {
        let (la, lb) = (self.la, self.lb);
        let mut columns = vec!["Change Type".to_string(), "Composite Key".to_string()];
        columns.extend(self.identifier_headers());
        columns.extend([
            format!("{la} Row #"),
            format!("{lb} Row #"),
            "Column".to_string(),
            format!("{la} Value"),
            format!("{lb} Value"),
            "Description".to_string(),
        ]);
        let mut table = ReportTable::new(
            format!("{DETAILS_PREFIX}{}", result.sheet_name),
            columns,
        );

        for record in &result.records {
            if !options.include_identical && record.kind() == RecordKind::Identical {
                continue;
            }
            let (pa, pb) = record.positions();
            let prefix = |row: &mut Vec<CellValue>| {
                row.push(text(record.kind().label()));
                row.push(text(record.key().value.clone()));
                row.extend(self.identifier_cells(result, record));
                row.push(row_number(pa));
                row.push(row_number(pb));
            };

            match record {
                DiffRecord::Identical { .. } => {
                    let mut row = Vec::new();
                    prefix(&mut row);
                    row.extend([
                        CellValue::Empty,
                        CellValue::Empty,
                        CellValue::Empty,
                        text("No differences"),
                    ]);
                    table.push_row(row);
                }
                DiffRecord::Modified { deltas, .. } => {
                    for delta in deltas {
                        let mut row = Vec::new();
                        prefix(&mut row);
                        row.extend([
                            text(delta.column.clone()),
                            delta.a.clone(),
                            delta.b.clone(),
                            text(format!(
                                "Value changed from '{}' to '{}'",
                                delta.a, delta.b
                            )),
                        ]);
                        table.push_row(row);
                    }
                }
                DiffRecord::OnlyInA { row: source, .. } => {
                    let mut row = Vec::new();
                    prefix(&mut row);
                    row.extend([
                        text(ALL_COLUMNS),
                        text(render_row(source)),
                        CellValue::Empty,
                        text(format!("Row exists only in {la}")),
                    ]);
                    table.push_row(row);
                }
                DiffRecord::OnlyInB { row: source, .. } => {
                    let mut row = Vec::new();
                    prefix(&mut row);
                    row.extend([
                        text(ALL_COLUMNS),
                        CellValue::Empty,
                        text(render_row(source)),
                        text(format!("Row exists only in {lb}")),
                    ]);
                    table.push_row(row);
                }
            }
        }
        table
    }
}
