//! SQLite-backed record store
//!
//! Holds projects, documents, confirmed indicators, legal frameworks, and
//! analysis results for one workspace in `.sbench/store.db`.

mod queries;
mod schema;

use std::path::Path;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rusqlite::Connection;
use thiserror::Error;

use crate::core::identity::RecordId;
use crate::core::workspace::Workspace;

/// Current schema version - tables are rebuilt empty on mismatch
const SCHEMA_VERSION: i32 = 1;

/// Errors from the record store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("database error: {0}")]
    #[diagnostic(code(sbench::store::sqlite))]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode record: {0}")]
    #[diagnostic(code(sbench::store::json))]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(sbench::store::io))]
    Io(String),

    #[error("{kind} '{id}' not found")]
    #[diagnostic(
        code(sbench::store::not_found),
        help("Run the matching list command to see available IDs")
    )]
    NotFound { kind: &'static str, id: String },
}

/// The record store backed by SQLite
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store for a workspace
    pub fn open(workspace: &Workspace) -> Result<Self, StoreError> {
        Self::open_path(&workspace.store_path())
    }

    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let mut store = Self { conn };
        if store.needs_schema_rebuild() {
            store.reinitialize_schema()?;
        }
        Ok(store)
    }

    /// Check if schema version matches current version
    fn needs_schema_rebuild(&self) -> bool {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .unwrap_or(0);
        current_version != SCHEMA_VERSION
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Read a column holding a record id
fn record_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<RecordId> {
    let text: String = row.get(idx)?;
    text.parse().map_err(|e: crate::core::identity::IdParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Read a column holding a `FromStr` enum
fn enum_col<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// Read a JSON text column
fn json_col<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
