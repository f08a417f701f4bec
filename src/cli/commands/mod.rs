//! CLI command implementations

pub mod analyze;
pub mod completions;
pub mod config;
pub mod doc;
pub mod extract;
pub mod framework;
pub mod ingest;
pub mod init;
pub mod project;
pub mod report;
