//! The ordered list of columns that identify a record.

use crate::error::{CompareErrorKind, Result, SheetDiffError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier columns used when none are configured.
pub const DEFAULT_IDENTIFIERS: [&str; 3] = ["Channel Name", "Program Date", "Clip Start Time"];

/// Ordered, non-empty list of identifier column names.
///
/// Names are trimmed, blanks are dropped and repeated names keep their first
/// position. Order matters: it is the order of the parts in a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct IdentifierSpec {
    columns: Vec<String>,
}

impl IdentifierSpec {
    /// Build a spec, failing with `EmptyIdentifierSpec` if no usable name remains.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for column in columns {
            let name = column.as_ref().trim();
            if !name.is_empty() && !unique.iter().any(|c| c == name) {
                unique.push(name.to_string());
            }
        }
        if unique.is_empty() {
            return Err(SheetDiffError::compare(
                "building identifier list",
                CompareErrorKind::EmptyIdentifierSpec,
            ));
        }
        Ok(Self { columns: unique })
    }

    /// Parse a comma-separated list such as `"Channel Name, Program Date"`.
    pub fn parse_list(list: &str) -> Result<Self> {
        Self::new(list.split(','))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

impl Default for IdentifierSpec {
    fn default() -> Self {
        Self {
            columns: DEFAULT_IDENTIFIERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl JsonSchema for IdentifierSpec {
    fn schema_name() -> String {
        "IdentifierSpec".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <Vec<String>>::json_schema(gen)
    }
}

impl TryFrom<Vec<String>> for IdentifierSpec {
    type Error = SheetDiffError;

    fn try_from(columns: Vec<String>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<IdentifierSpec> for Vec<String> {
    fn from(spec: IdentifierSpec) -> Self {
        spec.columns
    }
}

impl std::fmt::Display for IdentifierSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.columns.join(", "))
    }
}
