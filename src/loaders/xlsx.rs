//! Spreadsheet workbook loader (`calamine`).
//!
//! Every worksheet becomes one sheet, in workbook order. The first row is the
//! header; fully blank rows are skipped.

use super::csv::dedupe_headers;
use super::{dataset_label, DatasetFormat, DatasetLoader};
use crate::error::{LoadErrorKind, Result, SheetDiffError};
use crate::model::{CellValue, Dataset, Row, Table};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert an Excel serial number to a temporal cell.
///
/// Integral serials are dates, serials below one are times of day and
/// anything else is a datetime. Times are rounded to the second.
pub(crate) fn serial_to_cell(serial: f64) -> CellValue {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return CellValue::Number(serial);
    };
    if !serial.is_finite() || serial < 0.0 {
        return CellValue::Number(serial);
    }

    let total_seconds = (serial * SECONDS_PER_DAY).round() as i64;
    let Some(dt) = Duration::try_seconds(total_seconds).and_then(|d| epoch.checked_add_signed(d))
    else {
        return CellValue::Number(serial);
    };

    if serial < 1.0 {
        CellValue::Time(dt.time())
    } else if serial.fract() == 0.0 {
        CellValue::Date(dt.date())
    } else {
        CellValue::DateTime(dt)
    }
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => serial_to_cell(dt.as_f64()),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(CellValue::Date))
            .unwrap_or_else(|_| CellValue::text(s.clone())),
        Data::DurationIso(s) => CellValue::text(s.clone()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

fn header_names(cells: &[Data]) -> Vec<String> {
    dedupe_headers(cells.iter().map(|data| convert(data).canonical_string()))
}

/// Loader for `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookLoader;

impl WorkbookLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DatasetLoader for WorkbookLoader {
    fn load(&self, path: &Path) -> Result<Dataset> {
        let context = || format!("at {}", path.display());
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            SheetDiffError::load(context(), LoadErrorKind::Workbook(e.to_string()))
        })?;

        let mut dataset = Dataset::new(dataset_label(path));
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                SheetDiffError::load(
                    format!("{}: sheet '{name}'", context()),
                    LoadErrorKind::Workbook(e.to_string()),
                )
            })?;

            let mut rows = range.rows();
            let Some(header) = rows.next() else {
                tracing::debug!(sheet = %name, "Worksheet is empty");
                dataset.insert_sheet(name, Table::default());
                continue;
            };
            let columns = header_names(header);
            let mut table = Table::new(columns.iter().cloned());

            for cells in rows {
                let values: Vec<CellValue> = cells.iter().map(convert).collect();
                if values.iter().all(CellValue::is_blank) {
                    continue;
                }
                let row: Row = columns.iter().cloned().zip(values).collect();
                table.push_row(row);
            }
            tracing::debug!(sheet = %name, rows = table.row_count(), "Read worksheet");
            dataset.insert_sheet(name, table);
        }
        Ok(dataset)
    }

    fn format(&self) -> DatasetFormat {
        DatasetFormat::Workbook
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_serial_dates() {
        assert_eq!(
            serial_to_cell(45306.0),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(
            serial_to_cell(0.5),
            CellValue::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
        );
        assert_eq!(
            serial_to_cell(45306.6041666667),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(14, 30, 0)
                    .unwrap()
            )
        );
        assert_eq!(serial_to_cell(-1.0), CellValue::Number(-1.0));
    }

    #[test]
    fn test_convert_cells() {
        assert_eq!(convert(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::text("#DIV/0!")
        );
        assert_eq!(
            convert(&Data::DateTimeIso("2024-01-15".to_string())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_header_names() {
        let header = [
            Data::String("Value".to_string()),
            Data::Empty,
            Data::String("Value".to_string()),
            Data::Float(2024.0),
        ];
        assert_eq!(header_names(&header), vec!["Value", "Unnamed: 1", "Value.1", "2024"]);
    }

    #[test]
    fn test_missing_workbook() {
        let err = WorkbookLoader::new()
            .load(Path::new("/nonexistent/book.xlsx"))
            .unwrap_err();
        assert!(matches!(
            err,
            SheetDiffError::Load {
                source: LoadErrorKind::Workbook(_),
                ..
            }
        ));
    }
}
