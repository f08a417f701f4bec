//! Ingestion session - the state machine driving one indicator upload
//!
//! ```text
//! Idle -> Parsing -> NeedsMapping -> Parsed -> Reviewing -> Confirmed
//!                 \-------------------^
//! ```
//!
//! Every failed attempt returns the session to `Idle` with the error handed
//! back to the caller. `reset` reaches `Idle` from any state and discards
//! all indicator and issue state.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entities::indicator::{Indicator, SemanticField};

use super::columns::{apply_manual_mapping, resolve, ManualMapping};
use super::edit::{apply_edit, IndicatorSet};
use super::error::IngestError;
use super::rows::{drop_blank_rows, is_blank_row, parse, RawRow};
use super::sheet::{read_rows, SheetFormat};
use super::validate::{has_blocking_issues, validate_labeled, ValidationIssue, ValidationPolicy};

/// Maximum number of data rows, exclusive of the header row
pub const MAX_DATA_ROWS: usize = 10_000;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Parsing,
    NeedsMapping,
    Parsed,
    Reviewing,
    Confirmed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Parsing => "parsing",
            SessionState::NeedsMapping => "needs-mapping",
            SessionState::Parsed => "parsed",
            SessionState::Reviewing => "reviewing",
            SessionState::Confirmed => "confirmed",
        };
        write!(f, "{}", s)
    }
}

/// Legal next states from a given state
pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        Idle => vec![Parsing],
        Parsing => vec![NeedsMapping, Parsed, Idle],
        NeedsMapping => vec![Parsed, Idle],
        Parsed => vec![Reviewing, Confirmed, Idle],
        Reviewing => vec![Reviewing, Confirmed, Idle],
        Confirmed => vec![Idle],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Indicators plus the issues describing them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionResult {
    pub indicators: Vec<Indicator>,
    pub issues: Vec<ValidationIssue>,
}

/// What the caller must do after a parse step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Indicators are ready for review
    Parsed { indicators: usize, issues: usize },
    /// Required columns could not be resolved; ask the user for a mapping
    NeedsMapping {
        headers: Vec<String>,
        missing: BTreeSet<SemanticField>,
    },
}

/// Rows held while waiting for a manual column mapping
#[derive(Debug, Clone)]
struct PendingSheet {
    /// All non-trailing rows as read, header row included
    rows: Vec<RawRow>,
}

/// One indicator upload, from raw rows to a confirmed indicator set
#[derive(Debug)]
pub struct IngestionSession {
    policy: ValidationPolicy,
    state: SessionState,
    pending: Option<PendingSheet>,
    indicators: IndicatorSet,
    issues: Vec<ValidationIssue>,
    /// 1-based spreadsheet row of each indicator
    sheet_rows: Vec<usize>,
}

impl IngestionSession {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            state: SessionState::Idle,
            pending: None,
            indicators: IndicatorSet::new(),
            issues: Vec::new(),
            sheet_rows: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Spreadsheet row number (1-based, header included) of an indicator
    pub fn sheet_row(&self, index: usize) -> Option<usize> {
        self.sheet_rows.get(index).copied()
    }

    fn transition(&mut self, to: SessionState) -> Result<(), IngestError> {
        if !allowed(self.state, to) {
            return Err(IngestError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!(from = %self.state, to = %to, "ingestion state transition");
        self.state = to;
        Ok(())
    }

    /// Abandon the current attempt and surface the error
    fn fail(&mut self, err: IngestError) -> IngestError {
        tracing::debug!(from = %self.state, error = %err, "ingestion attempt failed");
        self.clear();
        self.state = SessionState::Idle;
        err
    }

    fn clear(&mut self) {
        self.pending = None;
        self.indicators = IndicatorSet::new();
        self.issues.clear();
        self.sheet_rows.clear();
    }

    /// Discard all indicator and issue state unconditionally
    pub fn reset(&mut self) {
        tracing::debug!(from = %self.state, "ingestion session reset");
        self.clear();
        self.state = SessionState::Idle;
    }

    /// Read spreadsheet bytes and run the pipeline
    pub fn ingest_bytes(&mut self, bytes: &[u8], format: SheetFormat) -> Result<StepOutcome, IngestError> {
        self.begin()?;
        match read_rows(bytes, format) {
            Ok(rows) => self.process_rows(rows, 0),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Run the pipeline over already-tabulated rows (row 0 is the header)
    pub fn ingest_rows(&mut self, rows: Vec<RawRow>) -> Result<StepOutcome, IngestError> {
        self.begin()?;
        self.process_rows(rows, 0)
    }

    /// Start a new attempt; a previous set is replaced wholesale
    fn begin(&mut self) -> Result<(), IngestError> {
        if self.state != SessionState::Idle {
            self.reset();
        }
        self.transition(SessionState::Parsing)
    }

    /// Resolve a pending sheet with an explicit user mapping
    pub fn confirm_mapping(&mut self, manual: &ManualMapping) -> Result<StepOutcome, IngestError> {
        if self.state != SessionState::NeedsMapping {
            return Err(IngestError::InvalidTransition {
                from: self.state,
                to: SessionState::Parsed,
            });
        }
        let Some(pending) = self.pending.take() else {
            return Err(self.fail(IngestError::EmptyFile));
        };

        let header_row = manual.header_row.unwrap_or(0);
        if header_row >= pending.rows.len() {
            return Err(self.fail(IngestError::InvalidMapping {
                reason: format!(
                    "header row {} is past the end of the sheet ({} rows)",
                    header_row + 1,
                    pending.rows.len()
                ),
            }));
        }

        // Rows above the chosen header row are titles or notes, not data
        let mut rows: Vec<RawRow> = pending.rows.into_iter().skip(header_row).collect();
        if let Err(e) = apply_manual_mapping(&mut rows[0], manual) {
            return Err(self.fail(e));
        }

        tracing::debug!(
            id = %manual.id_header,
            text = %manual.text_header,
            header_row,
            "manual column mapping confirmed"
        );
        self.state = SessionState::Parsing;
        self.process_rows(rows, header_row)
    }

    /// Shared pipeline: checks, resolution, parsing, validation
    ///
    /// `offset` is the zero-based sheet row of `rows[0]`.
    fn process_rows(&mut self, rows: Vec<RawRow>, offset: usize) -> Result<StepOutcome, IngestError> {
        if rows.is_empty() {
            return Err(self.fail(IngestError::EmptyFile));
        }

        // Leading blank rows are skipped; the first non-blank row is the header
        let leading = rows.iter().take_while(|r| is_blank_row(r)).count();
        let offset = offset + leading;
        let mut iter = rows.clone().into_iter().skip(leading);
        let headers: Vec<String> = match iter.next() {
            Some(h) => h,
            None => return Err(self.fail(IngestError::EmptyFile)),
        };

        let data = drop_blank_rows(iter.collect());
        if data.len() > MAX_DATA_ROWS {
            return Err(self.fail(IngestError::RowLimitExceeded {
                rows: data.len(),
                limit: MAX_DATA_ROWS,
            }));
        }

        let resolution = resolve(&headers);
        if !resolution.is_complete() {
            self.pending = Some(PendingSheet { rows });
            self.transition(SessionState::NeedsMapping)?;
            tracing::debug!(missing = ?resolution.missing_required, "required columns unresolved");
            return Ok(StepOutcome::NeedsMapping {
                headers,
                missing: resolution.missing_required,
            });
        }

        if data.is_empty() {
            return Err(self.fail(IngestError::NoDataRows));
        }

        // Data row at position p (after the header) sits at sheet row offset + p + 2
        let sheet_rows: Vec<usize> = data.iter().map(|(p, _)| offset + p + 2).collect();
        let data_rows: Vec<RawRow> = data.into_iter().map(|(_, row)| row).collect();
        let indicators = parse(&headers, &data_rows, &resolution.mapping);

        self.install(indicators, sheet_rows)
    }

    fn install(&mut self, indicators: Vec<Indicator>, sheet_rows: Vec<usize>) -> Result<StepOutcome, IngestError> {
        self.pending = None;
        self.sheet_rows = sheet_rows;
        self.issues = self.revalidate(&indicators);
        self.indicators = indicators.into_iter().collect();
        self.transition(SessionState::Parsed)?;

        tracing::info!(
            indicators = self.indicators.len(),
            issues = self.issues.len(),
            "indicator set parsed"
        );
        Ok(StepOutcome::Parsed {
            indicators: self.indicators.len(),
            issues: self.issues.len(),
        })
    }

    /// Validate a set, naming rows by their spreadsheet position
    fn revalidate<'a, I>(&self, indicators: I) -> Vec<ValidationIssue>
    where
        I: IntoIterator<Item = &'a Indicator>,
    {
        validate_labeled(indicators, &self.policy, |i| {
            self.sheet_rows.get(i).copied().unwrap_or(i + 2)
        })
    }

    /// Accept indicators produced by the extraction collaborator
    ///
    /// Extracted output goes through the same ceiling and validation as a
    /// spreadsheet before it is trusted.
    pub fn load_extracted(&mut self, indicators: Vec<Indicator>) -> Result<StepOutcome, IngestError> {
        self.begin()?;
        if indicators.is_empty() {
            return Err(self.fail(IngestError::NoDataRows));
        }
        if indicators.len() > MAX_DATA_ROWS {
            return Err(self.fail(IngestError::RowLimitExceeded {
                rows: indicators.len(),
                limit: MAX_DATA_ROWS,
            }));
        }
        let sheet_rows = (0..indicators.len()).map(|i| i + 2).collect();
        self.install(indicators, sheet_rows)
    }

    /// Edit one field of one indicator and revalidate the whole set
    ///
    /// The new set and its issues replace the old ones together.
    pub fn edit(
        &mut self,
        index: usize,
        field: SemanticField,
        value: impl Into<String>,
    ) -> Result<&[ValidationIssue], IngestError> {
        if !allowed(self.state, SessionState::Reviewing) {
            return Err(IngestError::InvalidTransition {
                from: self.state,
                to: SessionState::Reviewing,
            });
        }

        let next = apply_edit(&self.indicators, index, field, value)?;
        let issues = self.revalidate(&next);

        self.indicators = next;
        self.issues = issues;
        self.transition(SessionState::Reviewing)?;
        tracing::debug!(index, field = %field, issues = self.issues.len(), "indicator edited");
        Ok(&self.issues)
    }

    /// Whether the current set may move on to the next wizard step
    pub fn can_proceed(&self) -> bool {
        matches!(self.state, SessionState::Parsed | SessionState::Reviewing)
            && !has_blocking_issues(&self.issues, &self.policy)
    }

    /// Copy of the current indicators and issues
    pub fn snapshot(&self) -> IngestionResult {
        IngestionResult {
            indicators: self.indicators.iter().cloned().collect(),
            issues: self.issues.clone(),
        }
    }

    /// Hand the final set to the caller by value
    pub fn confirm(&mut self) -> Result<IngestionResult, IngestError> {
        if !allowed(self.state, SessionState::Confirmed) {
            return Err(IngestError::InvalidTransition {
                from: self.state,
                to: SessionState::Confirmed,
            });
        }
        let blocking = self
            .issues
            .iter()
            .filter(|i| self.policy.is_blocking(i))
            .count();
        if blocking > 0 {
            return Err(IngestError::BlockingIssues { count: blocking });
        }

        self.transition(SessionState::Confirmed)?;
        Ok(self.snapshot())
    }
}
