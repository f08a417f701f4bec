//! Row parsing - raw tabular rows into indicator records

use crate::entities::indicator::{Indicator, SemanticField};

use super::columns::HeaderMapping;

/// One raw spreadsheet row, blank cells as empty strings
pub type RawRow = Vec<String>;

/// True if every cell in the row is empty after trimming
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Remove fully blank rows, keeping the original (zero-based) position of each kept row
pub fn drop_blank_rows(rows: Vec<RawRow>) -> Vec<(usize, RawRow)> {
    rows.into_iter()
        .enumerate()
        .filter(|(_, row)| !is_blank_row(row))
        .collect()
}

fn cell(row: &[String], mapping: &HeaderMapping, field: SemanticField) -> String {
    mapping
        .column_index(field)
        .and_then(|idx| row.get(idx))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Convert data rows into indicators using a resolved mapping
///
/// Blank rows must already be filtered out. Row order is preserved, so the
/// position of each indicator is its row index for issue reporting.
pub fn parse(_headers: &[String], rows: &[RawRow], mapping: &HeaderMapping) -> Vec<Indicator> {
    rows.iter()
        .map(|row| Indicator {
            id: cell(row, mapping, SemanticField::Id),
            text: cell(row, mapping, SemanticField::Text),
            category: cell(row, mapping, SemanticField::Category),
            subcategory: cell(row, mapping, SemanticField::Subcategory),
            source: cell(row, mapping, SemanticField::Source),
            notes: cell(row, mapping, SemanticField::Notes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::columns::resolve;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic() {
        let headers = row(&["ID", "Indicator text", "Category"]);
        let mapping = resolve(&headers).mapping;
        let rows = vec![row(&[" E1 ", " Emissions ", "Environment"])];
        let parsed = parse(&headers, &rows, &mapping);
        assert_eq!(
            parsed,
            vec![Indicator::new("E1", "Emissions").with_category("Environment")]
        );
    }

    #[test]
    fn test_parse_short_rows_yield_empty() {
        let headers = row(&["ID", "Indicator text", "Notes"]);
        let mapping = resolve(&headers).mapping;
        let parsed = parse(&headers, &[row(&["E1"])], &mapping);
        assert_eq!(parsed[0].text, "");
        assert_eq!(parsed[0].notes, "");
    }

    #[test]
    fn test_drop_blank_rows_keeps_positions() {
        let rows = vec![row(&["a"]), row(&["", "  "]), row(&["b"])];
        let kept = drop_blank_rows(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].0, 0);
        assert_eq!(kept[1].0, 2);
    }
}
