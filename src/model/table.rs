//! Rows and tables.

use super::{parse_temporal, CellValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record: column name to value, in column order.
pub type Row = IndexMap<String, CellValue>;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Value of `column` in `row`, reading a missing column as [`CellValue::Empty`].
#[must_use]
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&EMPTY_CELL)
}

/// Row and column counts of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
}

/// An ordered set of rows sharing a sheet-wide column list.
///
/// Column names are unique; adding a duplicate name is a no-op. Rows may omit
/// columns (read as empty) and may carry extra keys, which comparisons ignore.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for column in columns {
            table.add_column(column);
        }
        table
    }

    /// Create a table from columns and rows.
    pub fn with_rows<I, S>(columns: I, rows: Vec<Row>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        table.rows = rows;
        table
    }

    /// Append a column name, returning false if it already existed.
    pub fn add_column(&mut self, column: impl Into<String>) -> bool {
        let column = column.into();
        if self.columns.contains(&column) {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Append a row given positionally; values beyond the column list are dropped.
    pub fn push_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let row: Row = self
            .columns
            .iter()
            .cloned()
            .zip(values.into_iter().map(Into::into))
            .collect();
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn shape(&self) -> TableShape {
        TableShape {
            rows: self.rows.len(),
            columns: self.columns.len(),
        }
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when `column` holds dates or times.
    ///
    /// A single native date, time or datetime cell is enough. A column of
    /// text counts when at least half of its non-blank values parse as a
    /// date or time, so CSV date columns qualify too.
    #[must_use]
    pub fn is_temporal_column(&self, column: &str) -> bool {
        let mut text = 0usize;
        let mut parsed = 0usize;
        for row in &self.rows {
            match cell(row, column) {
                value if value.is_temporal() => return true,
                CellValue::Text(raw) if !raw.trim().is_empty() => {
                    text += 1;
                    if parse_temporal(raw).is_some() {
                        parsed += 1;
                    }
                }
                _ => {}
            }
        }
        parsed > 0 && parsed * 2 >= text
    }
}

/// Build a [`Row`] from `(column, value)` pairs.
///
/// ```
/// use sheet_diff::model::{row, CellValue};
/// let r = row([("Channel Name", CellValue::from("Zee TV")), ("Value", 10.0.into())]);
/// assert_eq!(r.len(), 2);
/// ```
pub fn row<I, K>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, CellValue)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
