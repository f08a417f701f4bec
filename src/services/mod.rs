//! External collaborators: indicator extraction and compliance analysis
//!
//! Both are async traits so a networked implementation can replace the mock
//! ones without touching the callers.

pub mod analysis;
pub mod extraction;

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

pub use analysis::{ComplianceAnalyzer, MockAnalyzer, AnalysisRequest};
pub use extraction::{extract_with_deadline, ExtractionInput, IndicatorExtractor, MockExtractor};

/// Collaborator failures
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Extraction did not finish within {}", format_timeout(.timeout))]
    #[diagnostic(
        code(sbench::service::timeout),
        help("Retry, raise extraction_timeout_secs, or upload a spreadsheet instead")
    )]
    Timeout { timeout: Duration },

    #[error("Extraction was cancelled")]
    #[diagnostic(code(sbench::service::cancelled))]
    Cancelled,

    #[error("{service} failed: {message}")]
    #[diagnostic(code(sbench::service::failed))]
    Failed { service: &'static str, message: String },
}

/// Whole seconds as `Ns`, anything finer in milliseconds
fn format_timeout(timeout: &Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_precision() {
        let whole = ServiceError::Timeout { timeout: Duration::from_secs(120) };
        assert_eq!(whole.to_string(), "Extraction did not finish within 120s");

        let short = ServiceError::Timeout { timeout: Duration::from_millis(250) };
        assert_eq!(short.to_string(), "Extraction did not finish within 250ms");

        let mixed = ServiceError::Timeout { timeout: Duration::from_millis(1500) };
        assert_eq!(mixed.to_string(), "Extraction did not finish within 1500ms");
    }
}
