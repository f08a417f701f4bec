//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    analyze::AnalyzeArgs, completions::CompletionsArgs, config::ConfigCommands, doc::DocCommands,
    extract::ExtractArgs, framework::FrameworkCommands, ingest::IngestArgs, init::InitArgs,
    project::ProjectCommands, report::ReportCommands,
};

#[derive(Parser)]
#[command(name = "sbench")]
#[command(author, version, about = "Sustainability Benchmark")]
#[command(long_about = "Ingest sustainability indicator frameworks from spreadsheets, validate them, and benchmark them against regulatory frameworks.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Workspace root (default: auto-detect by finding .sbench/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new sbench workspace
    Init(InitArgs),

    /// Framework project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Ingest an indicator spreadsheet into a project
    Ingest(IngestArgs),

    /// Extract indicators from a framework document
    Extract(ExtractArgs),

    /// Supporting document management
    #[command(subcommand)]
    Doc(DocCommands),

    /// Browse legal frameworks available for analysis
    #[command(subcommand)]
    Framework(FrameworkCommands),

    /// Run a compliance analysis
    Analyze(AnalyzeArgs),

    /// Generate reports and exports
    #[command(subcommand)]
    Report(ReportCommands),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for list, details for show)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `Auto` against the configured default format
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|s| OutputFormat::from_str(s, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}
