//! Spreadsheet reading - raw file bytes into rows of cell strings
//!
//! Only the first worksheet is read. Blank cells become empty strings,
//! leading blank rows are kept so row numbers match the sheet, and trailing
//! blank rows are dropped.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::ReaderBuilder;

use super::error::IngestError;
use super::rows::{is_blank_row, RawRow};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Supported spreadsheet formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Tsv,
    Xlsx,
    Xls,
    Ods,
}

impl SheetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetFormat::Csv => "CSV",
            SheetFormat::Tsv => "TSV",
            SheetFormat::Xlsx => "XLSX",
            SheetFormat::Xls => "XLS",
            SheetFormat::Ods => "ODS",
        }
    }

    pub fn from_extension(ext: &str) -> Result<Self, IngestError> {
        match ext.to_lowercase().as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "tsv" | "tab" => Ok(SheetFormat::Tsv),
            "xlsx" | "xlsm" => Ok(SheetFormat::Xlsx),
            "xls" => Ok(SheetFormat::Xls),
            "ods" => Ok(SheetFormat::Ods),
            _ => Err(IngestError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
        }
    }

    /// Detect the format from a file name's extension
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn parse_error(format: SheetFormat, err: impl std::fmt::Display) -> IngestError {
    IngestError::Parse {
        format: format.as_str().to_string(),
        message: err.to_string(),
    }
}

/// Read the rows of the first sheet, header row included
pub fn read_rows(bytes: &[u8], format: SheetFormat) -> Result<Vec<RawRow>, IngestError> {
    let mut rows = match format {
        SheetFormat::Csv => read_delimited(bytes, b',', format)?,
        SheetFormat::Tsv => read_delimited(bytes, b'\t', format)?,
        SheetFormat::Xlsx | SheetFormat::Xls | SheetFormat::Ods => read_workbook(bytes, format)?,
    };

    while rows.last().is_some_and(|r| is_blank_row(r)) {
        rows.pop();
    }

    tracing::debug!(format = %format, rows = rows.len(), "read spreadsheet rows");
    Ok(rows)
}

fn read_delimited(bytes: &[u8], delimiter: u8, format: SheetFormat) -> Result<Vec<RawRow>, IngestError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| parse_error(format, e))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook(bytes: &[u8], format: SheetFormat) -> Result<Vec<RawRow>, IngestError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| parse_error(format, e))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| parse_error(format, e))?,
        None => return Ok(Vec::new()),
    };

    Ok(range_rows(&range))
}

/// Rows of a worksheet range, positioned as in the sheet
///
/// A range starts at its first used cell, so blank rows and columns before
/// it are restored as empty cells to keep sheet row numbers exact.
fn range_rows(range: &Range<Data>) -> Vec<RawRow> {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<RawRow> = vec![Vec::new(); start_row];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![String::new(); start_col];
        cells.extend(row.iter().map(cell_to_string));
        cells
    }));
    rows
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(SheetFormat::from_path(Path::new("a/b.XLSX")).unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_path(Path::new("f.csv")).unwrap(), SheetFormat::Csv);
        assert!(matches!(
            SheetFormat::from_path(Path::new("f.pdf")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_read_csv_rows() {
        let data = b"ID,Indicator text\nE1,\"Emissions, scope 1\"\nE2\n\n";
        let rows = read_rows(data, SheetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["E1", "Emissions, scope 1"]);
        assert_eq!(rows[2], vec!["E2"]);
    }

    #[test]
    fn test_read_csv_strips_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice(b"ID,Indicator text\n");
        let rows = read_rows(&data, SheetFormat::Csv).unwrap();
        assert_eq!(rows[0][0], "ID");
    }

    #[test]
    fn test_trailing_blank_rows_dropped() {
        let data = b"ID,Indicator text\nE1,Emissions\n,\n , \n";
        let rows = read_rows(data, SheetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_read_tsv() {
        let rows = read_rows(b"ID\tIndicator text\nE1\tEmissions\n", SheetFormat::Tsv).unwrap();
        assert_eq!(rows[1], vec!["E1", "Emissions"]);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = read_rows(&[0x49, 0x44, 0x0a, 0xff, 0xfe, 0x0a], SheetFormat::Csv).unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }

    #[test]
    fn test_leading_blank_rows_kept_in_csv() {
        let rows = read_rows(b",\nID,Indicator text\nE1,Emissions\n", SheetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(is_blank_row(&rows[0]));
        assert_eq!(rows[1][0], "ID");
    }

    #[test]
    fn test_workbook_range_offset_restored() {
        // Used cells start at C3 (zero-based row 2, column 2)
        let mut range: Range<Data> = Range::new((2, 2), (3, 3));
        range.set_value((2, 2), Data::String("ID".into()));
        range.set_value((2, 3), Data::String("Indicator text".into()));
        range.set_value((3, 2), Data::Float(101.0));
        range.set_value((3, 3), Data::String("Emissions".into()));

        let rows = range_rows(&range);
        assert_eq!(rows.len(), 4);
        assert!(is_blank_row(&rows[0]) && is_blank_row(&rows[1]));
        assert_eq!(rows[2], vec!["", "", "ID", "Indicator text"]);
        assert_eq!(rows[3], vec!["", "", "101", "Emissions"]);
    }

    #[test]
    fn test_empty_workbook_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_rows(&range).is_empty());
    }

    #[test]
    fn test_corrupt_workbook_is_parse_error() {
        let err = read_rows(b"definitely not a zip archive", SheetFormat::Xlsx).unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}
