//! Record matching: composite keys and per-table key indexes.
//!
//! Rows are matched across datasets by business key, never by position (unless
//! the row-position fallback is selected explicitly). The pieces are:
//!
//! - [`KeyBuilder`]: turns a row into a [`RecordKey`] using a [`KeyStrategy`]
//! - [`SheetIndex`]: maps each key of a table to the row it identifies and
//!   records [`DuplicateKey`]s and [`MalformedValue`]s found on the way
//!
//! # Example
//!
//! ```
//! use sheet_diff::matching::{shared_identifiers, DuplicatePolicy, KeyBuilder, SheetIndex};
//! use sheet_diff::model::{CellValue, IdentifierSpec, Table};
//!
//! let mut table = Table::new(["Channel Name", "Value"]);
//! table.push_values([CellValue::from("Zee TV"), CellValue::from(10.0)]);
//!
//! let spec = IdentifierSpec::default();
//! let ids = shared_identifiers(&spec, table.columns(), table.columns());
//! let keys = KeyBuilder::from_identifiers(ids).expect("Channel Name is shared");
//! let index = SheetIndex::build(&table, &keys, DuplicatePolicy::default());
//! assert!(index.contains_key("Zee TV"));
//! ```

pub mod index;
pub mod key;

pub use index::{
    index_table, DuplicateKey, DuplicatePolicy, IndexedRow, MalformedValue, SheetIndex,
};
pub use key::{
    available_identifiers, build_key, key_part, shared_identifiers, FallbackStrategy, KeyBuilder,
    KeyStrategy, NoIdentifiersAvailable, RecordKey, KEY_DELIMITER,
};
