//! Unified error types for sheet-diff.
//!
//! Structural failures (a run that cannot start, a sheet that cannot be compared)
//! are errors. Data-quality signals such as duplicate keys are not: they travel
//! inside the comparison result as [`ComparisonWarning`](crate::diff::ComparisonWarning)s.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheet-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SheetDiffError {
    /// Errors while reading a dataset
    #[error("Failed to load dataset: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// Errors while comparing datasets or sheets
    #[error("Comparison failed: {context}")]
    Compare {
        context: String,
        #[source]
        source: CompareErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("Unrecognised dataset format (expected .json, .csv, .tsv or a workbook)")]
    UnknownFormat,

    #[error("Invalid JSON dataset: {0}")]
    InvalidJson(String),

    #[error("Invalid CSV data: {0}")]
    InvalidCsv(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Missing header row in {0}")]
    MissingHeader(String),

    #[error("Support for {0} files was not compiled in")]
    FeatureDisabled(String),

    #[error("File is {size_mb} MB, exceeding the {limit_mb} MB limit")]
    TooLarge { size_mb: u64, limit_mb: u64 },
}

/// Specific comparison error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompareErrorKind {
    #[error("Table '{sheet}' has no columns")]
    InvalidTable { sheet: String },

    #[error("No configured identifier is present in both tables of '{sheet}'")]
    NoIdentifiersAvailable { sheet: String },

    #[error("Identifier list is empty")]
    EmptyIdentifierSpec,

    #[error("Neither dataset contains any sheets")]
    NoSheets,
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("CSV serialization failed: {0}")]
    CsvSerializationError(String),

    #[error("Output format not supported for this operation: {0}")]
    UnsupportedFormat(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sheet-diff operations
pub type Result<T> = std::result::Result<T, SheetDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SheetDiffError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create a load error for an unknown format
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::load(format!("at {}", path.into()), LoadErrorKind::UnknownFormat)
    }

    /// Create a comparison error
    pub fn compare(context: impl Into<String>, source: CompareErrorKind) -> Self {
        Self::Compare {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid-table error for a sheet
    pub fn invalid_table(sheet: impl Into<String>) -> Self {
        let sheet = sheet.into();
        Self::compare(
            format!("sheet '{sheet}'"),
            CompareErrorKind::InvalidTable { sheet },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// The comparison error kind, when this is a comparison error.
    #[must_use]
    pub fn compare_kind(&self) -> Option<&CompareErrorKind> {
        match self {
            Self::Compare { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SheetDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SheetDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::load(
            "JSON deserialization",
            LoadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<csv::Error> for SheetDiffError {
    fn from(err: csv::Error) -> Self {
        Self::load("CSV parsing", LoadErrorKind::InvalidCsv(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so an error surfacing from a
/// nested call reads like `"loading client.xlsx: sheet 'Jan': ..."`.
///
/// # Example
///
/// ```ignore
/// use sheet_diff::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<Dataset> {
///     let text = std::fs::read_to_string(path).context("reading dataset")?;
///     parse_json_dataset(&text, "input")
///         .with_context(|| format!("parsing {}", path.display()))
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error, prepending it to any existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SheetDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: SheetDiffError, new_ctx: &str) -> SheetDiffError {
    match err {
        SheetDiffError::Load {
            context: existing,
            source,
        } => SheetDiffError::Load {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SheetDiffError::Compare {
            context: existing,
            source,
        } => SheetDiffError::Compare {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SheetDiffError::Report {
            context: existing,
            source,
        } => SheetDiffError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SheetDiffError::Io {
            path,
            message,
            source,
        } => SheetDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SheetDiffError::Config(msg) => SheetDiffError::Config(chain_context(new_ctx, &msg)),
        SheetDiffError::Validation(msg) => {
            SheetDiffError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Returns `"new: existing"`, or just `new` when nothing was there yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a validation error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to a validation error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SheetDiffError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| SheetDiffError::Validation(f().into()))
    }
}
