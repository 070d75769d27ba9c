//! Composite record keys.
//!
//! A key is the canonical value of every identifier column available in both
//! tables, in identifier order, joined with [`KEY_DELIMITER`]. Delimiters and
//! backslashes inside a value are escaped so that distinct value tuples can
//! never produce the same key.
//!
//! When no identifier is shared the caller must pick a fallback explicitly
//! (see [`FallbackStrategy`]); [`KeyBuilder::from_identifiers`] refuses to build
//! a key out of nothing.

use crate::model::{cell, CellValue, IdentifierSpec, Row};
use crate::utils::content_hash;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between identifier parts of a composite key.
pub const KEY_DELIMITER: char = '|';

/// Raised when none of the configured identifiers can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("none of the configured identifier columns is available")]
pub struct NoIdentifiersAvailable;

/// How records are keyed when no identifier is shared by both tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackStrategy {
    /// Hash of the whole row over the common columns
    #[default]
    ContentHash,
    /// Source row position
    RowPosition,
    /// Treat the sheet as not comparable
    Fail,
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentHash => write!(f, "content-hash"),
            Self::RowPosition => write!(f, "row-position"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Identifier columns from `spec` that appear in `columns`, in spec order.
#[must_use]
pub fn available_identifiers(spec: &IdentifierSpec, columns: &[String]) -> Vec<String> {
    spec.iter()
        .filter(|id| columns.iter().any(|c| c == id))
        .map(str::to_string)
        .collect()
}

/// Identifier columns available in both column lists, in spec order.
#[must_use]
pub fn shared_identifiers(
    spec: &IdentifierSpec,
    columns_a: &[String],
    columns_b: &[String],
) -> Vec<String> {
    available_identifiers(spec, columns_a)
        .into_iter()
        .filter(|id| columns_b.contains(id))
        .collect()
}

/// Canonical string of a value with `delimiter` and `\` escaped.
#[must_use]
pub fn key_part(value: &CellValue, delimiter: char) -> String {
    let canonical = value.canonical_string();
    if !canonical.contains(delimiter) && !canonical.contains('\\') {
        return canonical;
    }
    let mut escaped = String::with_capacity(canonical.len() + 4);
    for ch in canonical.chars() {
        if ch == delimiter || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Join the key parts of `row` for the given identifiers.
#[must_use]
pub fn build_key(row: &Row, identifiers: &[String], delimiter: char) -> String {
    let mut key = String::new();
    for (i, id) in identifiers.iter().enumerate() {
        if i > 0 {
            key.push(delimiter);
        }
        key.push_str(&key_part(cell(row, id), delimiter));
    }
    key
}

/// A composite key together with its individual identifier parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// The joined key
    pub value: String,
    /// Canonical identifier values, unescaped; empty for fallback keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<String>,
}

impl RecordKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// How keys are derived for one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Composite of the shared identifier columns
    Identifiers { columns: Vec<String> },
    /// xxh3 hash of the canonical row over `columns`
    ContentHash { columns: Vec<String> },
    /// Source row position
    RowPosition,
}

/// Produces [`RecordKey`]s for rows of a sheet.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    strategy: KeyStrategy,
    delimiter: char,
}

impl KeyBuilder {
    /// Key on identifier columns. Fails if the list is empty.
    pub fn from_identifiers(columns: Vec<String>) -> Result<Self, NoIdentifiersAvailable> {
        if columns.is_empty() {
            return Err(NoIdentifiersAvailable);
        }
        Ok(Self {
            strategy: KeyStrategy::Identifiers { columns },
            delimiter: KEY_DELIMITER,
        })
    }

    /// Key on a content hash of the given columns.
    #[must_use]
    pub fn content_hash(columns: Vec<String>) -> Self {
        Self {
            strategy: KeyStrategy::ContentHash { columns },
            delimiter: KEY_DELIMITER,
        }
    }

    /// Key on row position.
    #[must_use]
    pub fn row_position() -> Self {
        Self {
            strategy: KeyStrategy::RowPosition,
            delimiter: KEY_DELIMITER,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn strategy(&self) -> &KeyStrategy {
        &self.strategy
    }

    /// Identifier columns the keys are built from (empty for fallbacks).
    #[must_use]
    pub fn identifier_columns(&self) -> &[String] {
        match &self.strategy {
            KeyStrategy::Identifiers { columns } => columns,
            _ => &[],
        }
    }

    /// True when keys are not derived from identifier columns.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        !matches!(self.strategy, KeyStrategy::Identifiers { .. })
    }

    /// Key for `row`, found at `position` in its table.
    #[must_use]
    pub fn key_for(&self, row: &Row, position: usize) -> RecordKey {
        match &self.strategy {
            KeyStrategy::Identifiers { columns } => RecordKey {
                value: build_key(row, columns, self.delimiter),
                parts: columns
                    .iter()
                    .map(|c| cell(row, c).canonical_string())
                    .collect(),
            },
            KeyStrategy::ContentHash { columns } => {
                RecordKey::new(format!("row:{:016x}", row_hash(row, columns)))
            }
            KeyStrategy::RowPosition => RecordKey::new(format!("pos:{position}")),
        }
    }
}

/// Hash of the canonical values of `columns`, length-prefixed so that value
/// boundaries are unambiguous.
fn row_hash(row: &Row, columns: &[String]) -> u64 {
    let mut buf = Vec::with_capacity(columns.len() * 16);
    for column in columns {
        let canonical = cell(row, column).canonical_string();
        buf.extend_from_slice(&(canonical.len() as u64).to_le_bytes());
        buf.extend_from_slice(canonical.as_bytes());
    }
    content_hash(&buf)
}
