//! Framework project entity - the wizard's top-level record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::user::CurrentUser;

use super::EntityError;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(format!("Invalid project status: {}", s)),
        }
    }
}

/// Progress recorded once indicators are confirmed
const PROGRESS_INDICATORS: u8 = 40;
/// Progress recorded once a legal framework is chosen
const PROGRESS_FRAMEWORK: u8 = 60;

/// A sustainability framework being benchmarked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkProject {
    pub id: RecordId,

    /// Framework name
    pub name: String,

    /// Framework version
    pub version: String,

    /// When the framework was published (free text, e.g. "2021" or "March 2023")
    pub publication_time: String,

    /// Standard-setting organization
    pub organization: String,

    /// User who created the project
    pub user_id: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub progress_percentage: u8,

    /// Legal framework chosen for analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_framework_id: Option<String>,

    pub created: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl FrameworkProject {
    /// Create a draft project; every descriptive field must be non-blank
    pub fn new(
        name: &str,
        version: &str,
        publication_time: &str,
        organization: &str,
        user: &CurrentUser,
    ) -> Result<Self, EntityError> {
        let required = |field: &'static str, value: &str| -> Result<String, EntityError> {
            let value = value.trim();
            if value.is_empty() {
                Err(EntityError::MissingField { field })
            } else {
                Ok(value.to_string())
            }
        };

        Ok(Self {
            id: RecordId::new(RecordPrefix::Proj),
            name: required("name", name)?,
            version: required("version", version)?,
            publication_time: required("publication time", publication_time)?,
            organization: required("organization", organization)?,
            user_id: user.as_str().to_string(),
            status: ProjectStatus::Draft,
            progress_percentage: 0,
            legal_framework_id: None,
            created: Utc::now(),
            completed_at: None,
        })
    }

    /// One-line description shown in listings
    pub fn description(&self) -> String {
        format!(
            "Framework: {} | Version: {} | Published: {} | Organization: {}",
            self.name, self.version, self.publication_time, self.organization
        )
    }

    pub fn mark_indicators_confirmed(&mut self) {
        if self.status == ProjectStatus::Draft {
            self.status = ProjectStatus::InProgress;
        }
        self.progress_percentage = self.progress_percentage.max(PROGRESS_INDICATORS);
    }

    pub fn select_legal_framework(&mut self, framework_id: &str) {
        self.legal_framework_id = Some(framework_id.to_string());
        if self.status == ProjectStatus::Draft {
            self.status = ProjectStatus::InProgress;
        }
        self.progress_percentage = self.progress_percentage.max(PROGRESS_FRAMEWORK);
    }

    pub fn complete(&mut self) {
        self.status = ProjectStatus::Completed;
        self.progress_percentage = 100;
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser::new("ana")
    }

    #[test]
    fn test_new_trims_and_requires_fields() {
        let p = FrameworkProject::new(" GRI ", "2021", "2021", "GSSB", &user()).unwrap();
        assert_eq!(p.name, "GRI");
        assert_eq!(p.status, ProjectStatus::Draft);
        assert!(p.id.to_string().starts_with("PROJ-"));

        let err = FrameworkProject::new("GRI", "2021", "  ", "GSSB", &user()).unwrap_err();
        assert!(matches!(err, EntityError::MissingField { field: "publication time" }));
    }

    #[test]
    fn test_progress_never_goes_backwards() {
        let mut p = FrameworkProject::new("GRI", "2021", "2021", "GSSB", &user()).unwrap();
        p.select_legal_framework("eu-csrd");
        assert_eq!(p.progress_percentage, 60);
        p.mark_indicators_confirmed();
        assert_eq!(p.progress_percentage, 60);
        p.complete();
        assert_eq!(p.status, ProjectStatus::Completed);
        assert!(p.completed_at.is_some());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [ProjectStatus::Draft, ProjectStatus::InProgress, ProjectStatus::Completed] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
    }
}
