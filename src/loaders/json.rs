//! JSON dataset loader.
//!
//! ```json
//! {
//!   "name": "client.xlsx",
//!   "sheets": {
//!     "Jan": {
//!       "columns": ["Channel Name", "Value"],
//!       "rows": [{"Channel Name": "Zee TV", "Value": 10}]
//!     }
//!   }
//! }
//! ```
//!
//! `columns` may be omitted; it is then the row keys in first-seen order.
//! Declared columns come first and keys not declared are appended.

use super::{dataset_label, read_input, DatasetFormat, DatasetLoader};
use crate::error::{LoadErrorKind, Result, SheetDiffError};
use crate::model::{Dataset, Row, Table};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonDocument {
    #[serde(default)]
    name: Option<String>,
    sheets: IndexMap<String, JsonSheet>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonSheet {
    #[serde(default)]
    columns: Option<Vec<String>>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl JsonSheet {
    fn into_table(self) -> Table {
        let mut table = Table::new(self.columns.unwrap_or_default());
        for row in &self.rows {
            for column in row.keys() {
                table.add_column(column.as_str());
            }
        }
        for row in self.rows {
            table.push_row(row);
        }
        table
    }
}

/// Loader for JSON dataset documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a document; `fallback_name` labels it when `name` is absent.
    pub fn parse_str(&self, content: &str, fallback_name: &str) -> Result<Dataset> {
        let document: JsonDocument = serde_json::from_str(content).map_err(|e| {
            SheetDiffError::load(
                format!("parsing {fallback_name}"),
                LoadErrorKind::InvalidJson(e.to_string()),
            )
        })?;

        let mut dataset = Dataset::new(document.name.unwrap_or_else(|| fallback_name.to_string()));
        for (name, sheet) in document.sheets {
            dataset.insert_sheet(name, sheet.into_table());
        }
        Ok(dataset)
    }
}

impl DatasetLoader for JsonLoader {
    fn load(&self, path: &Path) -> Result<Dataset> {
        let bytes = read_input(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            SheetDiffError::load(
                format!("at {}", path.display()),
                LoadErrorKind::InvalidJson(e.to_string()),
            )
        })?;
        self.parse_str(&content, &dataset_label(path))
    }

    fn format(&self) -> DatasetFormat {
        DatasetFormat::Json
    }
}
