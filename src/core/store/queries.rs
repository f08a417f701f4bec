//! Record reads and writes

use rusqlite::{params, OptionalExtension};

use crate::core::identity::RecordId;
use crate::entities::{
    AnalysisRecord, DocumentRecord, DocumentRole, FrameworkProject, Indicator, LegalFramework,
};

use super::{enum_col, format_datetime, json_col, parse_datetime, record_id, Store, StoreError};

const PROJECT_COLUMNS: &str = "id, name, version, publication_time, organization, user_id, status, \
     progress_percentage, legal_framework_id, created, completed_at";

const DOCUMENT_COLUMNS: &str = "id, project_id, user_id, role, original_filename, content_type, \
     file_size, sha256, storage_path, description, indicator_count, created";

const ANALYSIS_COLUMNS: &str = "id, project_id, user_id, legal_framework_id, analysis_type, status, \
     input_parameters, summary, ai_model_used, processing_time_seconds, error, created";

const FRAMEWORK_COLUMNS: &str =
    "id, name, description, category, jurisdiction, effective_date, version, is_active";

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FrameworkProject> {
    Ok(FrameworkProject {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        version: row.get(2)?,
        publication_time: row.get(3)?,
        organization: row.get(4)?,
        user_id: row.get(5)?,
        status: enum_col(row, 6)?,
        progress_percentage: row.get::<_, i64>(7)?.clamp(0, 100) as u8,
        legal_framework_id: row.get(8)?,
        created: parse_datetime(row.get(9)?),
        completed_at: row.get::<_, Option<String>>(10)?.map(parse_datetime),
    })
}

fn document_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        id: record_id(row, 0)?,
        project_id: record_id(row, 1)?,
        user_id: row.get(2)?,
        role: enum_col(row, 3)?,
        original_filename: row.get(4)?,
        content_type: row.get(5)?,
        file_size: row.get::<_, i64>(6)?.max(0) as u64,
        sha256: row.get(7)?,
        storage_path: row.get(8)?,
        description: row.get(9)?,
        indicator_count: row.get::<_, i64>(10)?.max(0) as usize,
        created: parse_datetime(row.get(11)?),
    })
}

fn analysis_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnalysisRecord> {
    let summary = match row.get::<_, Option<String>>(7)? {
        Some(_) => Some(json_col(row, 7)?),
        None => None,
    };
    Ok(AnalysisRecord {
        id: record_id(row, 0)?,
        project_id: record_id(row, 1)?,
        user_id: row.get(2)?,
        legal_framework_id: row.get(3)?,
        analysis_type: row.get(4)?,
        status: enum_col(row, 5)?,
        input_parameters: json_col(row, 6)?,
        summary,
        ai_model_used: row.get(8)?,
        processing_time_seconds: row.get(9)?,
        error: row.get(10)?,
        created: parse_datetime(row.get(11)?),
    })
}

fn framework_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LegalFramework> {
    Ok(LegalFramework {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        jurisdiction: row.get(4)?,
        effective_date: row.get(5)?,
        version: row.get(6)?,
        is_active: row.get(7)?,
    })
}

fn insert_document_tx(conn: &rusqlite::Connection, doc: &DocumentRecord) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO documents ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            DOCUMENT_COLUMNS
        ),
        params![
            doc.id.to_string(),
            doc.project_id.to_string(),
            doc.user_id,
            doc.role.as_str(),
            doc.original_filename,
            doc.content_type,
            doc.file_size as i64,
            doc.sha256,
            doc.storage_path,
            doc.description,
            doc.indicator_count as i64,
            format_datetime(&doc.created),
        ],
    )?;
    Ok(())
}

fn update_project_tx(conn: &rusqlite::Connection, project: &FrameworkProject) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE projects SET name = ?2, version = ?3, publication_time = ?4, organization = ?5,
             status = ?6, progress_percentage = ?7, legal_framework_id = ?8, completed_at = ?9
         WHERE id = ?1",
        params![
            project.id.to_string(),
            project.name,
            project.version,
            project.publication_time,
            project.organization,
            project.status.as_str(),
            project.progress_percentage as i64,
            project.legal_framework_id,
            project.completed_at.as_ref().map(format_datetime),
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            kind: "project",
            id: project.id.to_string(),
        });
    }
    Ok(())
}

impl Store {
    // =========================================================================
    // Legal frameworks
    // =========================================================================

    /// Insert catalog entries that are not already present
    pub fn seed_legal_frameworks(&mut self, frameworks: &[LegalFramework]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for fw in frameworks {
            inserted += tx.execute(
                &format!(
                    "INSERT OR IGNORE INTO legal_frameworks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    FRAMEWORK_COLUMNS
                ),
                params![
                    fw.id,
                    fw.name,
                    fw.description,
                    fw.category,
                    fw.jurisdiction,
                    fw.effective_date,
                    fw.version,
                    fw.is_active,
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!(inserted, "seeded legal frameworks");
        Ok(inserted)
    }

    pub fn list_legal_frameworks(&self, include_inactive: bool) -> Result<Vec<LegalFramework>, StoreError> {
        let sql = if include_inactive {
            format!("SELECT {} FROM legal_frameworks ORDER BY name", FRAMEWORK_COLUMNS)
        } else {
            format!(
                "SELECT {} FROM legal_frameworks WHERE is_active = 1 ORDER BY name",
                FRAMEWORK_COLUMNS
            )
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], framework_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_legal_framework(&self, id: &str) -> Result<Option<LegalFramework>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM legal_frameworks WHERE id = ?1", FRAMEWORK_COLUMNS),
                params![id],
                framework_from_row,
            )
            .optional()?)
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn insert_project(&self, project: &FrameworkProject) -> Result<(), StoreError> {
        self.conn.execute(
            &format!(
                "INSERT INTO projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                PROJECT_COLUMNS
            ),
            params![
                project.id.to_string(),
                project.name,
                project.version,
                project.publication_time,
                project.organization,
                project.user_id,
                project.status.as_str(),
                project.progress_percentage as i64,
                project.legal_framework_id,
                format_datetime(&project.created),
                project.completed_at.as_ref().map(format_datetime),
            ],
        )?;
        tracing::info!(id = %project.id, name = %project.name, "project created");
        Ok(())
    }

    pub fn update_project(&self, project: &FrameworkProject) -> Result<(), StoreError> {
        update_project_tx(&self.conn, project)
    }

    pub fn get_project(&self, id: &RecordId) -> Result<Option<FrameworkProject>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS),
                params![id.to_string()],
                project_from_row,
            )
            .optional()?)
    }

    /// Fetch a project or fail with `NotFound`
    pub fn require_project(&self, id: &RecordId) -> Result<FrameworkProject, StoreError> {
        self.get_project(id)?.ok_or_else(|| StoreError::NotFound {
            kind: "project",
            id: id.to_string(),
        })
    }

    /// Projects, newest first, optionally only those of one user
    pub fn list_projects(&self, user_id: Option<&str>) -> Result<Vec<FrameworkProject>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM projects WHERE ?1 IS NULL OR user_id = ?1 ORDER BY created DESC, id DESC",
            PROJECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![user_id], project_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // =========================================================================
    // Documents and indicators
    // =========================================================================

    pub fn insert_document(&self, doc: &DocumentRecord) -> Result<(), StoreError> {
        insert_document_tx(&self.conn, doc)?;
        tracing::info!(id = %doc.id, role = %doc.role, file = %doc.original_filename, "document recorded");
        Ok(())
    }

    pub fn list_documents(
        &self,
        project_id: &RecordId,
        role: Option<DocumentRole>,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM documents WHERE project_id = ?1 AND (?2 IS NULL OR role = ?2)
             ORDER BY created, id",
            DOCUMENT_COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![project_id.to_string(), role.map(|r| r.as_str())],
            document_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The framework document whose indicators are current, if any
    pub fn framework_document(&self, project_id: &RecordId) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM documents WHERE project_id = ?1 AND role = 'framework'
                     ORDER BY created DESC, id DESC LIMIT 1",
                    DOCUMENT_COLUMNS
                ),
                params![project_id.to_string()],
                document_from_row,
            )
            .optional()?)
    }

    /// Persist a confirmed indicator set with its source document
    ///
    /// One transaction: earlier framework documents and indicators of the
    /// project are replaced, the new ones are inserted, and the project row
    /// is updated.
    pub fn save_confirmed_ingestion(
        &mut self,
        project: &FrameworkProject,
        document: &DocumentRecord,
        indicators: &[Indicator],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let project_id = project.id.to_string();

        tx.execute("DELETE FROM indicators WHERE project_id = ?1", params![project_id])?;
        tx.execute(
            "DELETE FROM documents WHERE project_id = ?1 AND role = 'framework'",
            params![project_id],
        )?;

        let mut doc = document.clone();
        doc.indicator_count = indicators.len();
        insert_document_tx(&tx, &doc)?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO indicators (project_id, document_id, position, indicator_id, indicator_text,
                     category, subcategory, source, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            let document_id = doc.id.to_string();
            for (pos, ind) in indicators.iter().enumerate() {
                stmt.execute(params![
                    project_id,
                    document_id,
                    pos as i64,
                    ind.id,
                    ind.text,
                    ind.category,
                    ind.subcategory,
                    ind.source,
                    ind.notes,
                ])?;
            }
        }

        update_project_tx(&tx, project)?;
        tx.commit()?;

        tracing::info!(
            project = %project.id,
            document = %doc.id,
            indicators = indicators.len(),
            "confirmed indicators saved"
        );
        Ok(())
    }

    /// Confirmed indicators of a project in sheet order
    pub fn list_indicators(&self, project_id: &RecordId) -> Result<Vec<Indicator>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT indicator_id, indicator_text, category, subcategory, source, notes
             FROM indicators WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![project_id.to_string()], |row| {
            Ok(Indicator {
                id: row.get(0)?,
                text: row.get(1)?,
                category: row.get(2)?,
                subcategory: row.get(3)?,
                source: row.get(4)?,
                notes: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // =========================================================================
    // Analyses
    // =========================================================================

    pub fn insert_analysis(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        self.conn.execute(
            &format!(
                "INSERT INTO analysis_results ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                ANALYSIS_COLUMNS
            ),
            params![
                record.id.to_string(),
                record.project_id.to_string(),
                record.user_id,
                record.legal_framework_id,
                record.analysis_type,
                record.status.as_str(),
                serde_json::to_string(&record.input_parameters)?,
                record.summary.as_ref().map(serde_json::to_string).transpose()?,
                record.ai_model_used,
                record.processing_time_seconds,
                record.error,
                format_datetime(&record.created),
            ],
        )?;
        Ok(())
    }

    pub fn update_analysis(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE analysis_results SET status = ?2, summary = ?3, ai_model_used = ?4,
                 processing_time_seconds = ?5, error = ?6
             WHERE id = ?1",
            params![
                record.id.to_string(),
                record.status.as_str(),
                record.summary.as_ref().map(serde_json::to_string).transpose()?,
                record.ai_model_used,
                record.processing_time_seconds,
                record.error,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: "analysis",
                id: record.id.to_string(),
            });
        }
        tracing::info!(id = %record.id, status = %record.status, "analysis updated");
        Ok(())
    }

    pub fn list_analyses(&self, project_id: &RecordId) -> Result<Vec<AnalysisRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM analysis_results WHERE project_id = ?1 ORDER BY created DESC, id DESC",
            ANALYSIS_COLUMNS
        ))?;
        let rows = stmt.query_map(params![project_id.to_string()], analysis_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Most recent completed analysis of a project
    pub fn latest_completed_analysis(&self, project_id: &RecordId) -> Result<Option<AnalysisRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM analysis_results WHERE project_id = ?1 AND status = 'completed'
                     ORDER BY created DESC, id DESC LIMIT 1",
                    ANALYSIS_COLUMNS
                ),
                params![project_id.to_string()],
                analysis_from_row,
            )
            .optional()?)
    }
}
