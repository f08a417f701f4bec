//! Compliance analysis records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// Analysis run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            _ => Err(format!("Invalid analysis status: {}", s)),
        }
    }
}

/// Compliance band derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    High,
    Moderate,
    Low,
}

impl ComplianceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ComplianceLevel::High
        } else if score >= 60.0 {
            ComplianceLevel::Moderate
        } else {
            ComplianceLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceLevel::High => "High Compliance",
            ComplianceLevel::Moderate => "Moderate Compliance",
            ComplianceLevel::Low => "Low Compliance",
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome figures of a completed analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Percentage in 0..=100
    pub compliance_score: f64,
    pub total_indicators: usize,
    pub compliant_indicators: usize,
    pub gaps_identified: usize,
    pub critical_gaps: usize,
    pub supporting_documents_processed: usize,
    pub recommendations: String,
}

impl ComplianceSummary {
    pub fn level(&self) -> ComplianceLevel {
        ComplianceLevel::from_score(self.compliance_score)
    }
}

/// What an analysis was run against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub document_id: RecordId,
    pub legal_framework_id: String,
    pub supporting_documents: usize,
}

/// One compliance analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub project_id: RecordId,
    pub user_id: String,
    pub legal_framework_id: String,
    pub analysis_type: String,
    pub status: AnalysisStatus,
    pub input_parameters: AnalysisInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ComplianceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn start(project_id: RecordId, user_id: &str, input: AnalysisInput) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Anl),
            project_id,
            user_id: user_id.to_string(),
            legal_framework_id: input.legal_framework_id.clone(),
            analysis_type: "benchmarking".to_string(),
            status: AnalysisStatus::Processing,
            input_parameters: input,
            summary: None,
            ai_model_used: None,
            processing_time_seconds: None,
            error: None,
            created: Utc::now(),
        }
    }

    pub fn complete(&mut self, summary: ComplianceSummary, model: Option<String>, seconds: f64) {
        self.status = AnalysisStatus::Completed;
        self.summary = Some(summary);
        self.ai_model_used = model;
        self.processing_time_seconds = Some(seconds);
    }

    pub fn fail(&mut self, error: impl Into<String>, seconds: f64) {
        self.status = AnalysisStatus::Failed;
        self.error = Some(error.into());
        self.processing_time_seconds = Some(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_bands() {
        assert_eq!(ComplianceLevel::from_score(80.0), ComplianceLevel::High);
        assert_eq!(ComplianceLevel::from_score(79.9), ComplianceLevel::Moderate);
        assert_eq!(ComplianceLevel::from_score(60.0), ComplianceLevel::Moderate);
        assert_eq!(ComplianceLevel::from_score(59.99), ComplianceLevel::Low);
        assert_eq!(ComplianceLevel::from_score(78.5).label(), "Moderate Compliance");
    }

    #[test]
    fn test_lifecycle() {
        let input = AnalysisInput {
            document_id: RecordId::new(RecordPrefix::Doc),
            legal_framework_id: "eu-csrd".into(),
            supporting_documents: 0,
        };
        let mut record = AnalysisRecord::start(RecordId::new(RecordPrefix::Proj), "ana", input);
        assert_eq!(record.status, AnalysisStatus::Processing);
        record.fail("analyzer unavailable", 0.5);
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("analyzer unavailable"));
    }
}
