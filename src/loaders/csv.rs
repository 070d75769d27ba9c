//! Delimited-text loader (CSV, TSV and directories of them).
//!
//! The first record is the header. Repeated header names get `.1`, `.2`
//! suffixes and blank ones become `Unnamed: <index>`. Cells are typed with
//! [`CellValue::infer`]; records whose cells are all blank are skipped.

use super::{dataset_label, read_input, DatasetFormat, DatasetLoader};
use crate::error::{LoadErrorKind, Result, SheetDiffError};
use crate::model::{CellValue, Dataset, Row, Table};
use ::csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Loader for a single delimited file or a directory of them.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    /// Comma-separated loader.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Tab-separated loader.
    #[must_use]
    pub const fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Parse delimited text into a table.
    pub fn parse_table(&self, content: &[u8], source: &str) -> Result<Table> {
        let invalid = |message: String| {
            SheetDiffError::load(format!("parsing {source}"), LoadErrorKind::InvalidCsv(message))
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record.map_err(|e| invalid(e.to_string()))?,
            None => {
                return Err(SheetDiffError::load(
                    format!("parsing {source}"),
                    LoadErrorKind::MissingHeader(source.to_string()),
                ))
            }
        };
        let columns = dedupe_headers(header.iter());
        let mut table = Table::new(columns.iter().cloned());

        for record in records {
            let record = record.map_err(|e| invalid(e.to_string()))?;
            let values: Vec<CellValue> = record.iter().map(CellValue::infer).collect();
            if values.iter().all(CellValue::is_blank) {
                continue;
            }
            if values.len() > columns.len() {
                tracing::warn!(
                    source,
                    line = record.position().map_or(0, ::csv::Position::line),
                    "Record has more fields than the header; extra fields dropped"
                );
            }
            let row: Row = columns.iter().cloned().zip(values).collect();
            table.push_row(row);
        }
        Ok(table)
    }

    fn load_file(&self, path: &Path) -> Result<Table> {
        let bytes = read_input(path)?;
        self.parse_table(&bytes, &path.display().to_string())
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Dataset> {
        if path.is_dir() {
            return load_csv_dir(path);
        }
        let sheet = path
            .file_stem()
            .map_or_else(|| "Sheet1".to_string(), |s| s.to_string_lossy().into_owned());
        let table = self.load_file(path)?;
        Ok(Dataset::new(dataset_label(path)).with_sheet(sheet, table))
    }

    fn format(&self) -> DatasetFormat {
        if self.delimiter == b'\t' {
            DatasetFormat::Tsv
        } else {
            DatasetFormat::Csv
        }
    }
}

/// Load every `*.csv` / `*.tsv` file of `dir` as one sheet, sorted by file name.
pub fn load_csv_dir(dir: &Path) -> Result<Dataset> {
    let entries = std::fs::read_dir(dir).map_err(|e| SheetDiffError::io(dir, e))?;
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SheetDiffError::io(dir, e))?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if path.is_file() && matches!(ext.as_deref(), Some("csv" | "tsv")) {
            files.push(path);
        }
    }
    files.sort();

    let mut dataset = Dataset::new(dataset_label(dir));
    for path in files {
        let loader = if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
        {
            CsvLoader::tsv()
        } else {
            CsvLoader::new()
        };
        let sheet = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let table = loader.load_file(&path)?;
        if dataset.insert_sheet(sheet.clone(), table).is_some() {
            tracing::warn!(sheet = %sheet, "Two files map to the same sheet; keeping the later one");
        }
    }
    Ok(dataset)
}

/// Make header names unique and non-empty.
pub(crate) fn dedupe_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();
    for (idx, name) in raw.into_iter().enumerate() {
        let name = name.as_ref().trim_start_matches('\u{feff}');
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        columns.push(candidate);
    }
    columns
}
