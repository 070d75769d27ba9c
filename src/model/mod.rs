//! In-memory representation of tabular datasets.
//!
//! Every loader normalizes its input into these structures before any comparison
//! takes place. A [`Dataset`] is a set of named [`Table`]s; a table is an ordered
//! list of [`Row`]s that share one column list; a row maps column names to
//! [`CellValue`]s.
//!
//! ```
//! use sheet_diff::model::{CellValue, Dataset, Table};
//!
//! let mut table = Table::new(["Channel Name", "Value"]);
//! table.push_values([CellValue::from("Zee TV"), CellValue::from(10.0)]);
//! let dataset = Dataset::new("client.xlsx").with_sheet("Sheet1", table);
//! assert_eq!(dataset.sheet("Sheet1").map(|t| t.row_count()), Some(1));
//! ```

mod dataset;
mod identifiers;
mod table;
mod value;

pub use dataset::*;
pub use identifiers::*;
pub use table::*;
pub use value::*;
