//! Database schema initialization

use rusqlite::params;

use super::{Store, StoreError, SCHEMA_VERSION};

impl Store {
    /// Drop all tables and recreate them empty
    pub(super) fn reinitialize_schema(&mut self) -> Result<(), StoreError> {
        tracing::debug!(version = SCHEMA_VERSION, "rebuilding store schema");
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS analysis_results;
            DROP TABLE IF EXISTS indicators;
            DROP TABLE IF EXISTS documents;
            DROP TABLE IF EXISTS projects;
            DROP TABLE IF EXISTS legal_frameworks;
            DROP TABLE IF EXISTS schema_version;
            "#,
        )?;
        self.init_schema()
    }

    fn init_schema(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS legal_frameworks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                jurisdiction TEXT NOT NULL DEFAULT '',
                effective_date TEXT,
                version TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                version TEXT NOT NULL,
                publication_time TEXT NOT NULL,
                organization TEXT NOT NULL,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                progress_percentage INTEGER NOT NULL DEFAULT 0,
                legal_framework_id TEXT REFERENCES legal_frameworks(id),
                created TEXT NOT NULL,
                completed_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_projects_user ON projects(user_id);

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                original_filename TEXT NOT NULL,
                content_type TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                sha256 TEXT NOT NULL,
                storage_path TEXT NOT NULL,
                description TEXT,
                indicator_count INTEGER NOT NULL DEFAULT 0,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_documents_project ON documents(project_id);

            -- Confirmed indicators, in sheet order
            CREATE TABLE IF NOT EXISTS indicators (
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                indicator_id TEXT NOT NULL,
                indicator_text TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                subcategory TEXT NOT NULL DEFAULT '',
                source TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (document_id, position)
            );
            CREATE INDEX IF NOT EXISTS idx_indicators_project ON indicators(project_id);

            CREATE TABLE IF NOT EXISTS analysis_results (
                id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                legal_framework_id TEXT NOT NULL,
                analysis_type TEXT NOT NULL,
                status TEXT NOT NULL,
                input_parameters TEXT NOT NULL,
                summary TEXT,
                ai_model_used TEXT,
                processing_time_seconds REAL,
                error TEXT,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_analysis_project ON analysis_results(project_id);
            "#,
        )?;
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        tx.commit()?;
        Ok(())
    }
}
