//! Indicator ingestion pipeline
//!
//! Spreadsheet bytes flow through `sheet` (cells), `normalize` and
//! `columns` (header resolution), `rows` (indicator records), and
//! `validate` (issues). `session` drives the steps as a state machine and
//! `edit` applies copy-on-write corrections during review.

pub mod columns;
pub mod edit;
pub mod error;
pub mod export;
pub mod normalize;
pub mod rows;
pub mod session;
pub mod sheet;
pub mod validate;

pub use columns::{apply_manual_mapping, resolve, ColumnRef, ColumnResolution, HeaderMapping, ManualMapping};
pub use edit::{apply_edit, IndicatorSet};
pub use error::IngestError;
pub use export::{export_filename, to_csv_string, write_csv, DEFAULT_EXPORT_HEADERS};
pub use normalize::normalize;
pub use session::{allowed_transitions, IngestionResult, IngestionSession, SessionState, StepOutcome, MAX_DATA_ROWS};
pub use sheet::{read_rows, SheetFormat};
pub use validate::{
    has_blocking_issues, validate, validate_labeled, DuplicateReporting, IssueKind, IssueSummary, ValidationIssue,
    ValidationPolicy, DEFAULT_POLICY,
};
