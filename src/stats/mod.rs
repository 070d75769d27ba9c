//! Accuracy statistics for compared sheets and whole runs.
//!
//! Rates are always in `[0, 1]`; a zero denominator yields 0 rather than NaN.

mod aggregate;

pub use aggregate::{
    ratio, summarize, ColumnAccuracy, IdentifierCoverage, IdentifierStat, RunStats, SheetStats,
};
