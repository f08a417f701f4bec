//! `sbench report` command - Compliance reports and indicator exports

use chrono::Utc;
use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{open_context, resolve_project, write_output};
use crate::cli::GlobalOpts;
use crate::ingest::export::{export_filename, to_csv_string};
use crate::report::{report_filename, ReportContext, ReportGenerator};

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Plain-text compliance report of the latest completed analysis
    Summary(SummaryArgs),

    /// Confirmed indicators as CSV
    Indicators(IndicatorsArgs),
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Output file (default: stdout)
    #[arg(long, short = 'o', conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Write to the default report file name in the current directory
    #[arg(long)]
    pub save: bool,
}

#[derive(clap::Args, Debug)]
pub struct IndicatorsArgs {
    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Output file (default: stdout)
    #[arg(long, short = 'o', conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Write to "<framework file>-indicators.csv" in the current directory
    #[arg(long)]
    pub save: bool,
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::Summary(args) => run_summary(args, global),
        ReportCommands::Indicators(args) => run_indicators(args, global),
    }
}

fn run_summary(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, _) = open_context(global)?;
    let project = resolve_project(&store, &args.project)?;

    let analysis = store.latest_completed_analysis(&project.id)?.ok_or_else(|| {
        miette::miette!(
            help = "Run 'sbench analyze --project ID --framework ID' first",
            "Project {} has no completed analysis",
            project.id
        )
    })?;
    let framework = store
        .get_legal_framework(&analysis.legal_framework_id)?
        .ok_or_else(|| {
            miette::miette!(
                "Legal framework '{}' of analysis {} no longer exists",
                analysis.legal_framework_id,
                analysis.id
            )
        })?;
    let document_name = store
        .framework_document(&project.id)?
        .map(|d| d.original_filename)
        .unwrap_or_else(|| "-".to_string());

    let generated = Utc::now();
    let report = ReportGenerator::new()?.compliance_report(&ReportContext {
        project: &project,
        framework: &framework,
        document_name: &document_name,
        analysis: &analysis,
        generated,
    })?;

    let output = if args.save {
        Some(PathBuf::from(report_filename(&project, generated)))
    } else {
        args.output
    };
    write_output(&report, output.as_deref(), global.quiet)
}

fn run_indicators(args: IndicatorsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, _) = open_context(global)?;
    let project = resolve_project(&store, &args.project)?;

    let indicators = store.list_indicators(&project.id)?;
    if indicators.is_empty() {
        return Err(miette::miette!(
            help = "Run 'sbench ingest FILE --project ID' first",
            "Project {} has no confirmed indicators",
            project.id
        ));
    }

    let csv = to_csv_string(&indicators).into_diagnostic()?;

    let output = if args.save {
        let original = store
            .framework_document(&project.id)?
            .map(|d| d.original_filename)
            .unwrap_or_default();
        Some(PathBuf::from(export_filename(&original)))
    } else {
        args.output
    };
    write_output(&csv, output.as_deref(), global.quiet)
}
