//! Indicator set validation
//!
//! The issue list is always regenerated from the full set; it is never
//! patched incrementally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::indicator::Indicator;

/// Minimum trimmed length of indicator text
pub const MIN_TEXT_LENGTH: usize = 3;

/// How duplicate identifiers are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReporting {
    /// One issue at every repeated occurrence after the first
    #[default]
    PerRow,
    /// A single set-level issue summarizing all duplicated ids
    Aggregate,
}

impl std::fmt::Display for DuplicateReporting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateReporting::PerRow => write!(f, "per_row"),
            DuplicateReporting::Aggregate => write!(f, "aggregate"),
        }
    }
}

impl std::str::FromStr for DuplicateReporting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_row" | "row" => Ok(DuplicateReporting::PerRow),
            "aggregate" => Ok(DuplicateReporting::Aggregate),
            _ => Err(format!(
                "Invalid duplicate reporting mode: {}. Use per_row or aggregate",
                s
            )),
        }
    }
}

/// Validation policy
///
/// Duplicate ids block progression by default and are reported per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub duplicates_are_blocking: bool,
    pub duplicate_reporting: DuplicateReporting,
    pub min_text_length: usize,
}

/// Policy used when nothing is configured
pub const DEFAULT_POLICY: ValidationPolicy = ValidationPolicy {
    duplicates_are_blocking: true,
    duplicate_reporting: DuplicateReporting::PerRow,
    min_text_length: MIN_TEXT_LENGTH,
};

impl Default for ValidationPolicy {
    fn default() -> Self {
        DEFAULT_POLICY
    }
}

impl ValidationPolicy {
    pub fn with_duplicates_blocking(mut self, blocking: bool) -> Self {
        self.duplicates_are_blocking = blocking;
        self
    }

    pub fn with_duplicate_reporting(mut self, reporting: DuplicateReporting) -> Self {
        self.duplicate_reporting = reporting;
        self
    }

    /// Whether an issue prevents moving past the indicator step
    pub fn is_blocking(&self, issue: &ValidationIssue) -> bool {
        match issue.kind {
            IssueKind::EmptyId | IssueKind::ShortText => true,
            IssueKind::DuplicateId => self.duplicates_are_blocking,
        }
    }
}

/// Kind of structural defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyId,
    DuplicateId,
    ShortText,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::EmptyId => write!(f, "empty_id"),
            IssueKind::DuplicateId => write!(f, "duplicate_id"),
            IssueKind::ShortText => write!(f, "short_text"),
        }
    }
}

/// A detected defect in an indicator set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Zero-based index into the indicator set; `None` for set-level issues
    pub row_index: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    fn at_row(kind: IssueKind, row_index: usize, message: String) -> Self {
        Self {
            kind,
            row_index: Some(row_index),
            message,
        }
    }
}

/// Row label used in messages: header is row 1, first data row is row 2
fn sheet_row(index: usize) -> usize {
    index + 2
}

/// Scan an indicator set for empty ids, duplicate ids, and short text
pub fn validate<'a, I>(indicators: I, policy: &ValidationPolicy) -> Vec<ValidationIssue>
where
    I: IntoIterator<Item = &'a Indicator>,
{
    validate_labeled(indicators, policy, sheet_row)
}

/// [`validate`] with messages naming rows through `row_label`
///
/// `row_label` maps an index in the set to the spreadsheet row shown to the
/// user, for sheets whose rows were not contiguous.
pub fn validate_labeled<'a, I, F>(indicators: I, policy: &ValidationPolicy, row_label: F) -> Vec<ValidationIssue>
where
    I: IntoIterator<Item = &'a Indicator>,
    F: Fn(usize) -> usize,
{
    let mut issues = Vec::new();
    let mut first_seen: HashMap<&'a str, usize> = HashMap::new();
    // Duplicated ids in first-repeat order, with occurrence counts
    let mut duplicates: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();

    for (i, ind) in indicators.into_iter().enumerate() {
        let id = ind.id.trim();
        if id.is_empty() {
            issues.push(ValidationIssue::at_row(
                IssueKind::EmptyId,
                i,
                "Indicator ID is empty".to_string(),
            ));
        } else if let Some(&first) = first_seen.get(id) {
            let count = counts.entry(id).or_insert(1);
            *count += 1;
            if *count == 2 {
                duplicates.push(id);
            }
            if policy.duplicate_reporting == DuplicateReporting::PerRow {
                issues.push(ValidationIssue::at_row(
                    IssueKind::DuplicateId,
                    i,
                    format!(
                        "Duplicate Indicator ID '{}' (first used in row {})",
                        id,
                        row_label(first)
                    ),
                ));
            }
        } else {
            first_seen.insert(id, i);
        }

        let text_len = ind.text.trim().chars().count();
        if text_len < policy.min_text_length {
            let message = if text_len == 0 {
                "Indicator text is empty".to_string()
            } else {
                format!(
                    "Indicator text too short (min {} chars)",
                    policy.min_text_length
                )
            };
            issues.push(ValidationIssue::at_row(IssueKind::ShortText, i, message));
        }
    }

    if policy.duplicate_reporting == DuplicateReporting::Aggregate && !duplicates.is_empty() {
        let shown: Vec<&str> = duplicates.iter().take(3).copied().collect();
        let more = duplicates.len().saturating_sub(shown.len());
        let mut message = format!("Duplicate Indicator IDs found: {}", shown.join(", "));
        if more > 0 {
            message.push_str(&format!(" and {} more", more));
        }
        issues.push(ValidationIssue {
            kind: IssueKind::DuplicateId,
            row_index: None,
            message,
        });
    }

    issues
}

/// Whether any issue blocks progression under the policy
pub fn has_blocking_issues(issues: &[ValidationIssue], policy: &ValidationPolicy) -> bool {
    issues.iter().any(|i| policy.is_blocking(i))
}

/// Issue counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub empty_ids: usize,
    pub duplicate_ids: usize,
    pub short_texts: usize,
}

impl IssueSummary {
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            match issue.kind {
                IssueKind::EmptyId => summary.empty_ids += 1,
                IssueKind::DuplicateId => summary.duplicate_ids += 1,
                IssueKind::ShortText => summary.short_texts += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.empty_ids + self.duplicate_ids + self.short_texts
    }
}

impl std::fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.duplicate_ids > 0 {
            parts.push(format!("{} duplicates", self.duplicate_ids));
        }
        if self.empty_ids > 0 {
            parts.push(format!("{} empty IDs", self.empty_ids));
        }
        if self.short_texts > 0 {
            parts.push(format!("{} short texts", self.short_texts));
        }
        if parts.is_empty() {
            write!(f, "no issues")
        } else {
            write!(f, "{}", parts.join(" • "))
        }
    }
}
