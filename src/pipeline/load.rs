//! Dataset loading stage.
//!
//! Loads both inputs and narrows them to the requested sheets.

use super::PipelineError;
use crate::loaders::load_dataset;
use crate::model::Dataset;
use anyhow::Result;
use std::path::Path;

/// Load a dataset with context for error messages
pub fn load_dataset_with_context(path: &Path, quiet: bool) -> Result<Dataset> {
    if !quiet {
        tracing::info!("Loading dataset: {}", path.display());
    }

    let dataset = load_dataset(path).map_err(|e| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;

    if !quiet {
        let rows: usize = dataset.sheets().map(|(_, t)| t.row_count()).sum();
        tracing::info!("Loaded {} sheet(s), {} row(s)", dataset.sheet_count(), rows);
    }
    Ok(dataset)
}

/// Restrict both datasets to `sheets`; an empty list keeps everything.
///
/// Requested names found in neither dataset are logged, not rejected.
pub fn select_sheets(a: &mut Dataset, b: &mut Dataset, sheets: &[String]) {
    if sheets.is_empty() {
        return;
    }
    for name in sheets {
        if a.sheet(name).is_none() && b.sheet(name).is_none() {
            tracing::warn!(sheet = %name, "Requested sheet not found in either dataset");
        }
    }
    a.retain_sheets(sheets);
    b.retain_sheets(sheets);
}

/// Pair two single-sheet datasets whose sheet names differ.
///
/// Single CSV files are named after their file stem, so `jan.csv` against
/// `jan_it.csv` would otherwise never be compared. B's sheet takes A's name.
pub fn align_single_sheets(a: &Dataset, b: &mut Dataset) {
    if a.sheet_count() != 1 || b.sheet_count() != 1 {
        return;
    }
    let (Some(name_a), Some(name_b)) = (a.sheet_names().next(), b.sheet_names().next()) else {
        return;
    };
    if name_a != name_b {
        tracing::info!(sheet_a = %name_a, sheet_b = %name_b, "Pairing the only sheet of each dataset");
        let (name_a, name_b) = (name_a.to_string(), name_b.to_string());
        b.rename_sheet(&name_b, name_a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn dataset(name: &str, sheets: &[&str]) -> Dataset {
        sheets.iter().fold(Dataset::new(name), |d, s| {
            d.with_sheet(*s, Table::new(["k"]))
        })
    }

    #[test]
    fn test_select_sheets() {
        let mut a = dataset("a", &["Jan", "Feb", "Mar"]);
        let mut b = dataset("b", &["Feb", "Mar"]);
        select_sheets(&mut a, &mut b, &["Mar".to_string(), "Jan".to_string()]);
        assert_eq!(a.sheet_names().collect::<Vec<_>>(), vec!["Jan", "Mar"]);
        assert_eq!(b.sheet_names().collect::<Vec<_>>(), vec!["Mar"]);
    }

    #[test]
    fn test_select_no_sheets_keeps_all() {
        let mut a = dataset("a", &["Jan", "Feb"]);
        let mut b = dataset("b", &["Jan"]);
        select_sheets(&mut a, &mut b, &[]);
        assert_eq!(a.sheet_count(), 2);
        assert_eq!(b.sheet_count(), 1);
    }

    #[test]
    fn test_align_single_sheets() {
        let a = dataset("a", &["jan"]);
        let mut b = dataset("b", &["jan_it"]);
        align_single_sheets(&a, &mut b);
        assert_eq!(b.sheet_names().collect::<Vec<_>>(), vec!["jan"]);

        let mut multi = dataset("c", &["x", "y"]);
        align_single_sheets(&a, &mut multi);
        assert_eq!(multi.sheet_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_load_error_has_path_context() {
        let err = load_dataset_with_context(Path::new("/nonexistent/a.csv"), true).unwrap_err();
        assert!(err.to_string().starts_with("Load failed for /nonexistent/a.csv: "));
    }
}
