//! Key-to-row index for one table.
//!
//! Building the index walks the table once. Keys keep the order in which they
//! were first seen, which is what makes diff output order deterministic. A key
//! that appears more than once is a data-quality finding, not an error: it is
//! recorded in [`SheetIndex::duplicates`] and one row is kept according to the
//! [`DuplicatePolicy`].

use super::{KeyBuilder, RecordKey};
use crate::model::{cell, parse_temporal, CellValue, Row, Table};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which row survives when several rows share a key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The row seen last replaces earlier ones
    #[default]
    #[value(name = "last-wins")]
    #[serde(rename = "last-wins")]
    LastWriteWins,
    /// The row seen first is kept
    #[value(name = "first-wins")]
    #[serde(rename = "first-wins")]
    FirstWriteWins,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastWriteWins => write!(f, "last-wins"),
            Self::FirstWriteWins => write!(f, "first-wins"),
        }
    }
}

/// A row retained in the index.
#[derive(Debug, Clone)]
pub struct IndexedRow<'a> {
    pub key: RecordKey,
    /// 0-based position of the row in its table
    pub position: usize,
    pub row: &'a Row,
}

/// A key produced by more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub key: String,
    /// Every source position that produced the key, ascending
    pub positions: Vec<usize>,
    /// The position kept in the index
    pub retained: usize,
}

impl DuplicateKey {
    /// Rows dropped from the index for this key.
    #[must_use]
    pub fn collapsed(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

/// Text in a date/time identifier column that does not read as a date or time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedValue {
    pub position: usize,
    pub column: String,
    /// Trimmed raw text, used verbatim in the key
    pub raw: String,
}

/// Mapping from composite key to the single retained row.
#[derive(Debug, Clone, Default)]
pub struct SheetIndex<'a> {
    entries: IndexMap<String, IndexedRow<'a>>,
    duplicates: Vec<DuplicateKey>,
    malformed: Vec<MalformedValue>,
}

impl<'a> SheetIndex<'a> {
    /// Index every row of `table`.
    pub fn build(table: &'a Table, keys: &KeyBuilder, policy: DuplicatePolicy) -> Self {
        let temporal_columns: Vec<&String> = keys
            .identifier_columns()
            .iter()
            .filter(|c| table.is_temporal_column(c))
            .collect();

        let mut entries: IndexMap<String, IndexedRow<'a>> =
            IndexMap::with_capacity(table.row_count());
        let mut collisions: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut malformed = Vec::new();

        for (position, row) in table.rows().iter().enumerate() {
            for column in &temporal_columns {
                if let CellValue::Text(raw) = cell(row, column) {
                    let raw = raw.trim();
                    if !raw.is_empty() && parse_temporal(raw).is_none() {
                        malformed.push(MalformedValue {
                            position,
                            column: (*column).clone(),
                            raw: raw.to_string(),
                        });
                    }
                }
            }

            let key = keys.key_for(row, position);
            let value = key.value.clone();
            let indexed = IndexedRow { key, position, row };
            match entries.get_mut(&value) {
                Some(existing) => {
                    collisions
                        .entry(value)
                        .or_insert_with(|| vec![existing.position])
                        .push(position);
                    if policy == DuplicatePolicy::LastWriteWins {
                        *existing = indexed;
                    }
                }
                None => {
                    entries.insert(value, indexed);
                }
            }
        }

        let duplicates: Vec<DuplicateKey> = collisions
            .into_iter()
            .map(|(key, positions)| {
                let retained = entries.get(&key).map_or(0, |e| e.position);
                DuplicateKey {
                    key,
                    positions,
                    retained,
                }
            })
            .collect();

        if !duplicates.is_empty() {
            tracing::debug!(
                duplicate_keys = duplicates.len(),
                policy = %policy,
                "Collapsed rows sharing a key"
            );
        }

        Self {
            entries,
            duplicates,
            malformed,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&IndexedRow<'a>> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedRow<'a>> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    #[must_use]
    pub fn malformed(&self) -> &[MalformedValue] {
        &self.malformed
    }
}

/// Index a table and return the index with its duplicate keys.
pub fn index_table<'a>(
    table: &'a Table,
    keys: &KeyBuilder,
    policy: DuplicatePolicy,
) -> (SheetIndex<'a>, Vec<DuplicateKey>) {
    let index = SheetIndex::build(table, keys, policy);
    let duplicates = index.duplicates.clone();
    (index, duplicates)
}
