//! Indicator export back to CSV
//!
//! Exported files use the canonical headers, so they resolve without any
//! manual mapping when ingested again.

use std::io::Write;
use std::path::Path;

use crate::entities::indicator::{Indicator, SemanticField};

/// Header row written on export, in column order
pub const DEFAULT_EXPORT_HEADERS: [SemanticField; 6] = [
    SemanticField::Id,
    SemanticField::Text,
    SemanticField::Category,
    SemanticField::Subcategory,
    SemanticField::Source,
    SemanticField::Notes,
];

/// Write indicators as CSV, header row first
pub fn write_csv<'a, W, I>(indicators: I, writer: W) -> csv::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Indicator>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(DEFAULT_EXPORT_HEADERS.iter().map(|f| f.canonical_header()))?;
    for ind in indicators {
        wtr.write_record(DEFAULT_EXPORT_HEADERS.iter().map(|f| ind.field(*f)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render indicators as a CSV string
pub fn to_csv_string<'a, I>(indicators: I) -> csv::Result<String>
where
    I: IntoIterator<Item = &'a Indicator>,
{
    let mut buf = Vec::new();
    write_csv(indicators, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Default export file name: `{stem}-indicators.csv`
pub fn export_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "framework".to_string());
    format!("{}-indicators.csv", stem)
}
