//! Dataset loaders.
//!
//! Each loader turns one input into a [`Dataset`]: an ordered set of named
//! sheets. The format is chosen from the path:
//!
//! | input | sheets |
//! |---|---|
//! | `.json` | the document's `sheets` object |
//! | `.csv` / `.tsv` | one sheet named after the file stem |
//! | directory | one sheet per `*.csv` / `*.tsv` file, sorted by name |
//! | `.xlsx` `.xlsm` `.xlsb` `.xls` `.ods` | every worksheet, in workbook order |
//!
//! ```no_run
//! use sheet_diff::loaders::load_dataset;
//! use std::path::Path;
//!
//! let dataset = load_dataset(Path::new("client.json")).unwrap();
//! println!("{} sheets", dataset.sheet_count());
//! ```

mod csv;
mod json;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use self::csv::{load_csv_dir, CsvLoader};
pub use json::JsonLoader;
#[cfg(feature = "xlsx")]
pub use xlsx::WorkbookLoader;

use crate::error::{LoadErrorKind, Result, SheetDiffError};
use crate::model::Dataset;
use std::path::Path;

/// Largest single input file accepted (512 MB).
const MAX_DATASET_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Input formats understood by [`load_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
    Tsv,
    /// A directory of CSV/TSV files
    CsvDirectory,
    /// A spreadsheet workbook
    Workbook,
}

impl DatasetFormat {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Tsv => "TSV",
            Self::CsvDirectory => "CSV directory",
            Self::Workbook => "workbook",
        }
    }
}

/// Detect the input format from the path alone.
#[must_use]
pub fn detect_format(path: &Path) -> Option<DatasetFormat> {
    if path.is_dir() {
        return Some(DatasetFormat::CsvDirectory);
    }
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(DatasetFormat::Json),
        "csv" => Some(DatasetFormat::Csv),
        "tsv" | "tab" => Some(DatasetFormat::Tsv),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(DatasetFormat::Workbook),
        _ => None,
    }
}

/// Trait for format-specific dataset loaders.
pub trait DatasetLoader {
    /// Load a dataset from a path.
    fn load(&self, path: &Path) -> Result<Dataset>;

    /// Format this loader reads.
    fn format(&self) -> DatasetFormat;
}

/// Label for a dataset loaded from `path`: its file name.
pub(crate) fn dataset_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Read a whole file, refusing anything above the size limit.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path).map_err(|e| SheetDiffError::io(path, e))?;
    if metadata.len() > MAX_DATASET_FILE_SIZE {
        return Err(SheetDiffError::load(
            format!("at {}", path.display()),
            LoadErrorKind::TooLarge {
                size_mb: metadata.len() / (1024 * 1024),
                limit_mb: MAX_DATASET_FILE_SIZE / (1024 * 1024),
            },
        ));
    }
    std::fs::read(path).map_err(|e| SheetDiffError::io(path, e))
}

fn loader_for(format: DatasetFormat) -> Result<Box<dyn DatasetLoader>> {
    match format {
        DatasetFormat::Json => Ok(Box::new(JsonLoader::new())),
        DatasetFormat::Csv | DatasetFormat::CsvDirectory => Ok(Box::new(CsvLoader::new())),
        DatasetFormat::Tsv => Ok(Box::new(CsvLoader::tsv())),
        #[cfg(feature = "xlsx")]
        DatasetFormat::Workbook => Ok(Box::new(WorkbookLoader::new())),
        #[cfg(not(feature = "xlsx"))]
        DatasetFormat::Workbook => Err(SheetDiffError::load(
            "opening workbook",
            LoadErrorKind::FeatureDisabled("xlsx".to_string()),
        )),
    }
}

/// Detect the format of `path` and load it.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let format = detect_format(path)
        .ok_or_else(|| SheetDiffError::unknown_format(path.display().to_string()))?;
    tracing::debug!(path = %path.display(), format = format.name(), "Loading dataset");

    let dataset = loader_for(format)?.load(path)?;
    tracing::info!(
        path = %path.display(),
        sheets = dataset.sheet_count(),
        "Loaded {}",
        dataset.name()
    );
    Ok(dataset)
}
