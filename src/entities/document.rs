//! Uploaded document records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

use super::EntityError;

/// Largest accepted upload
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "csv", "txt", "tsv", "ods"];

/// What a document is for within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    /// The framework file indicators were taken from
    Framework,
    /// Additional context for analysis
    Supporting,
}

impl DocumentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentRole::Framework => "framework",
            DocumentRole::Supporting => "supporting",
        }
    }
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "framework" => Ok(DocumentRole::Framework),
            "supporting" => Ok(DocumentRole::Supporting),
            _ => Err(format!("Invalid document role: {}", s)),
        }
    }
}

/// A stored upload and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: RecordId,
    pub project_id: RecordId,
    pub user_id: String,
    pub role: DocumentRole,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: u64,
    /// Hex SHA-256 of the stored bytes
    pub sha256: String,
    /// Object key returned by the object store
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Indicators confirmed from this document (framework documents only)
    #[serde(default)]
    pub indicator_count: usize,
    pub created: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(
        project_id: RecordId,
        user_id: &str,
        role: DocumentRole,
        original_filename: &str,
        file_size: u64,
        sha256: String,
        storage_path: String,
    ) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Doc),
            project_id,
            user_id: user_id.to_string(),
            role,
            original_filename: original_filename.to_string(),
            content_type: content_type_for(original_filename).to_string(),
            file_size,
            sha256,
            storage_path,
            description: None,
            indicator_count: 0,
            created: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }
}

/// Lowercased extension of a file name, if any
pub fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Check the upload rules: allowed extension and size ceiling
pub fn check_upload(filename: &str, size: u64) -> Result<(), EntityError> {
    let ext = extension_of(filename).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(EntityError::UnsupportedUpload {
            filename: filename.to_string(),
        });
    }
    if size > MAX_DOCUMENT_BYTES {
        return Err(EntityError::UploadTooLarge {
            size,
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

/// MIME type recorded for an upload
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("ods") => "application/vnd.oasis.opendocument.spreadsheet",
        Some("csv") => "text/csv",
        Some("tsv") => "text/tab-separated-values",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_rules() {
        assert!(check_upload("report.PDF", 1024).is_ok());
        assert!(check_upload("framework.xlsx", MAX_DOCUMENT_BYTES).is_ok());
        assert!(matches!(
            check_upload("framework.xlsx", MAX_DOCUMENT_BYTES + 1),
            Err(EntityError::UploadTooLarge { .. })
        ));
        assert!(matches!(
            check_upload("payload.exe", 10),
            Err(EntityError::UnsupportedUpload { .. })
        ));
        assert!(check_upload("noext", 10).is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("a.csv"), "text/csv");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }

    #[test]
    fn test_blank_description_dropped() {
        let doc = DocumentRecord::new(
            RecordId::new(RecordPrefix::Proj),
            "ana",
            DocumentRole::Supporting,
            "policy.pdf",
            10,
            "00".into(),
            "ana/p/1.pdf".into(),
        )
        .with_description(Some("  ".into()));
        assert!(doc.description.is_none());
        assert_eq!(doc.content_type, "application/pdf");
    }
}
