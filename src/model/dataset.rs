//! Named collections of sheets.

use super::Table;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two compared datasets something belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A labelled set of sheets in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    sheets: IndexMap<String, Table>,
}

impl Dataset {
    /// Create an empty dataset. The name is used as a label in reports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: IndexMap::new(),
        }
    }

    /// Builder-style sheet insertion.
    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert_sheet(name, table);
        self
    }

    /// Insert or replace a sheet, returning the previous table.
    pub fn insert_sheet(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.sheets.insert(name.into(), table)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rename a sheet in place, keeping its position. False if `from` is absent
    /// or `to` is already taken by another sheet.
    pub fn rename_sheet(&mut self, from: &str, to: impl Into<String>) -> bool {
        let to = to.into();
        if from == to {
            return self.sheets.contains_key(from);
        }
        if self.sheets.contains_key(&to) {
            return false;
        }
        let Some((index, _, table)) = self.sheets.shift_remove_full(from) else {
            return false;
        };
        self.sheets.shift_insert(index, to, table);
        true
    }

    /// Keep only the named sheets, preserving workbook order.
    pub fn retain_sheets(&mut self, names: &[String]) {
        self.sheets.retain(|name, _| names.contains(name));
    }

    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
