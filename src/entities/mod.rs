//! Record types
//!
//! - [`Indicator`] - one row of an ingested sustainability framework
//! - [`FrameworkProject`] - the framework being benchmarked
//! - [`DocumentRecord`] - framework and supporting uploads
//! - [`LegalFramework`] - regulations available for analysis
//! - [`AnalysisRecord`] - a compliance analysis run and its summary

pub mod analysis;
pub mod document;
pub mod indicator;
pub mod legal_framework;
pub mod project;

pub use analysis::{AnalysisInput, AnalysisRecord, AnalysisStatus, ComplianceLevel, ComplianceSummary};
pub use document::{DocumentRecord, DocumentRole};
pub use indicator::{Indicator, SemanticField};
pub use legal_framework::LegalFramework;
pub use project::{FrameworkProject, ProjectStatus};

use miette::Diagnostic;
use thiserror::Error;

/// Record construction and upload rule violations
#[derive(Debug, Error, Diagnostic)]
pub enum EntityError {
    #[error("Please enter a {field}")]
    #[diagnostic(code(sbench::entity::missing_field))]
    MissingField { field: &'static str },

    #[error("Unsupported file type: {filename}")]
    #[diagnostic(
        code(sbench::entity::unsupported_upload),
        help("Accepted types: pdf, doc, docx, xls, xlsx, csv, txt, tsv, ods")
    )]
    UnsupportedUpload { filename: String },

    #[error("File is {size} bytes; the limit is {limit} bytes")]
    #[diagnostic(code(sbench::entity::upload_too_large), help("Uploads are limited to 10 MB"))]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("Legal framework catalog is invalid: {message}")]
    #[diagnostic(code(sbench::entity::catalog))]
    Catalog { message: String },
}
