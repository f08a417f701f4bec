//! Workspace discovery and layout
//!
//! A workspace is any directory containing `.sbench/`. It holds the config
//! file, the SQLite store, and the object directory for uploaded files.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the workspace marker directory
pub const WORKSPACE_DIR: &str = ".sbench";

/// Represents an sbench workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing `.sbench/`
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current = std::env::current_dir().map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        loop {
            if current.join(WORKSPACE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use an explicit root if given, otherwise discover from the current directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, WorkspaceError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create the workspace layout at `path`
    ///
    /// Fails if `.sbench/` already exists unless `force` is set, in which case
    /// the config file is rewritten and existing data is kept.
    pub fn init(path: &Path, force: bool) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let dir = root.join(WORKSPACE_DIR);
        if dir.exists() && !force {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        std::fs::create_dir_all(dir.join("objects")).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        std::fs::write(dir.join("config.yaml"), Self::default_config())
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        tracing::info!(root = %root.display(), "workspace initialized");
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# sbench workspace configuration

# Name recorded on projects, documents, and analyses (default: git user.name, then $USER)
# user: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Whether duplicate indicator IDs block confirmation
# duplicates_are_blocking: true

# How duplicate IDs are reported: per_row or aggregate
# duplicate_reporting: per_row

# Seconds before document extraction is abandoned
# extraction_timeout_secs: 120
"#
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.sbench/` directory
    pub fn sbench_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.sbench_dir().join("config.yaml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.sbench_dir().join("store.db")
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.sbench_dir().join("objects")
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not an sbench workspace (searched from {searched_from:?}). Run 'sbench init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("sbench workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}
