//! Ingestion errors with remedial diagnostics

use miette::Diagnostic;
use thiserror::Error;

use super::session::SessionState;

/// Errors that stop an ingestion attempt or reject a session action
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum IngestError {
    #[error("The spreadsheet appears to be empty")]
    #[diagnostic(
        code(sbench::ingest::empty_file),
        help("Upload a file whose first row contains the 'ID' and 'Indicator text' headers")
    )]
    EmptyFile,

    #[error("Maximum {limit} indicators allowed, but the file has {rows} data rows")]
    #[diagnostic(
        code(sbench::ingest::row_limit),
        help("Split the framework into smaller files; the header row is not counted")
    )]
    RowLimitExceeded { rows: usize, limit: usize },

    #[error("Failed to parse {format} file: {message}")]
    #[diagnostic(
        code(sbench::ingest::parse),
        help("Ensure the file is a valid XLS/XLSX/ODS/CSV file")
    )]
    Parse { format: String, message: String },

    #[error("Unsupported file type: '{extension}'")]
    #[diagnostic(
        code(sbench::ingest::unsupported_format),
        help("Supported spreadsheet types: csv, tsv, xlsx, xls, ods")
    )]
    UnsupportedFormat { extension: String },

    #[error("The spreadsheet has headers but no data rows")]
    #[diagnostic(
        code(sbench::ingest::no_data_rows),
        help("Add at least one indicator row below the header row")
    )]
    NoDataRows,

    #[error("Your file must contain {} in the header row", format_missing(.missing))]
    #[diagnostic(
        code(sbench::ingest::missing_columns),
        help("Rename the columns in your file, or choose them with --id-column and --text-column")
    )]
    MissingRequiredColumns { missing: Vec<String> },

    #[error("Invalid column mapping: {reason}")]
    #[diagnostic(code(sbench::ingest::invalid_mapping))]
    InvalidMapping { reason: String },

    #[error("Row index {index} is out of range ({len} indicators)")]
    #[diagnostic(code(sbench::ingest::row_out_of_range))]
    RowOutOfRange { index: usize, len: usize },

    #[error("{count} blocking validation issue(s) must be resolved before continuing")]
    #[diagnostic(
        code(sbench::ingest::blocking_issues),
        help("Fix the rows listed above in your file, or edit them with --set ROW.FIELD=VALUE")
    )]
    BlockingIssues { count: usize },

    #[error("Cannot move ingestion from {from} to {to}")]
    #[diagnostic(code(sbench::ingest::invalid_transition))]
    InvalidTransition { from: SessionState, to: SessionState },
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("'{}'", m))
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = IngestError::MissingRequiredColumns {
            missing: vec!["ID".into(), "Indicator text".into()],
        };
        assert_eq!(
            err.to_string(),
            "Your file must contain 'ID' and 'Indicator text' in the header row"
        );
    }

    #[test]
    fn test_row_limit_message() {
        let err = IngestError::RowLimitExceeded {
            rows: 10_001,
            limit: 10_000,
        };
        assert!(err.to_string().contains("10001"));
    }
}
