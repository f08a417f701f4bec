//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::{Config, Store, Workspace};
use crate::entities::FrameworkProject;

/// Format a RecordId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
/// This provides a consistent display format across all list/table outputs.
pub fn format_short_id(id: &RecordId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write command output to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                eprintln!(
                    "{} Written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Locate the workspace from `--workspace` or the current directory
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    Workspace::locate(global.workspace.as_deref()).map_err(|e| miette::miette!("{}", e))
}

/// Workspace, its store, and the effective configuration
pub fn open_context(global: &GlobalOpts) -> Result<(Workspace, Store, Config)> {
    let workspace = open_workspace(global)?;
    let config = Config::load_for(Some(&workspace));
    let store = Store::open(&workspace)?;
    Ok((workspace, store, config))
}

/// Resolve a project argument: a full ID or a unique prefix of one
///
/// The prefix may omit `PROJ-` and is matched case-insensitively.
pub fn resolve_project(store: &Store, input: &str) -> Result<FrameworkProject> {
    if let Ok(id) = RecordId::parse_as(input, RecordPrefix::Proj) {
        return Ok(store.require_project(&id)?);
    }

    let needle = input.trim().to_uppercase();
    if needle.is_empty() {
        return Err(miette::miette!("Project ID is empty"));
    }
    let bare = needle.strip_prefix("PROJ-").unwrap_or(&needle).to_string();

    let mut matches: Vec<FrameworkProject> = store
        .list_projects(None)?
        .into_iter()
        .filter(|p| p.id.ulid().to_string().starts_with(&bare))
        .collect();

    match matches.len() {
        0 => Err(miette::miette!(
            help = "Run 'sbench project list' to see available projects",
            "No project found matching '{}'",
            input
        )),
        1 => Ok(matches.remove(0)),
        n => Err(miette::miette!(
            "'{}' matches {} projects; use more characters",
            input,
            n
        )),
    }
}

/// File name shown and stored for an upload
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read an upload, rejecting missing files early with a clear message
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(miette::miette!("File not found: {}", path.display()));
    }
    std::fs::read(path).into_diagnostic()
}

/// Single-threaded runtime for commands that await a collaborator
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| miette::miette!("failed to initialize tokio runtime: {e}"))
}
