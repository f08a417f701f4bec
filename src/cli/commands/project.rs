//! `sbench project` command - Framework project management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, open_context, resolve_project};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::CurrentUser;
use crate::entities::{DocumentRole, FrameworkProject};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project for a sustainability framework
    New(NewArgs),

    /// List projects
    List(ListArgs),

    /// Show a project's details
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Framework name (e.g. "GRI Standards")
    #[arg(long)]
    pub name: String,

    /// Framework version
    #[arg(id = "framework_version", long = "framework-version", value_name = "VERSION")]
    pub version: String,

    /// When the framework was published
    #[arg(long)]
    pub published: String,

    /// Standard-setting organization
    #[arg(long)]
    pub organization: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only projects created by the current user
    #[arg(long)]
    pub mine: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project ID or unique prefix
    pub id: String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("version", "VERSION", 12),
    ColumnDef::new("organization", "ORGANIZATION", 20),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("progress", "PROGRESS", 8),
    ColumnDef::new("created", "CREATED", 10),
];

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::New(args) => run_new(args, global),
        ProjectCommands::List(args) => run_list(args, global),
        ProjectCommands::Show(args) => run_show(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let user = CurrentUser::resolve(&config);

    let project = FrameworkProject::new(
        &args.name,
        &args.version,
        &args.published,
        &args.organization,
        &user,
    )?;
    store.insert_project(&project)?;
    tracing::info!(id = %project.id, user = %user, "project created");

    match global.format.resolve(config.default_format.as_deref()) {
        OutputFormat::Id => println!("{}", project.id),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&project).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&project).into_diagnostic()?),
        _ => {
            println!(
                "{} Created project {}",
                style("✓").green(),
                style(&project.id).cyan()
            );
            if !global.quiet {
                println!("   {}", style(project.description()).dim());
                println!();
                println!(
                    "Next: {}",
                    style(format!("sbench ingest FILE --project {}", format_short_id(&project.id)))
                        .yellow()
                );
            }
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let user = CurrentUser::resolve(&config);
    let projects = store.list_projects(args.mine.then(|| user.as_str()))?;

    if args.count {
        println!("{}", projects.len());
        return Ok(());
    }

    let format = global.format.resolve(config.default_format.as_deref());
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&projects).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&projects).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    if projects.is_empty() {
        if !global.quiet && format == OutputFormat::Auto {
            println!("No projects found.");
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = projects
        .iter()
        .map(|p| {
            TableRow::new(p.id.to_string())
                .cell(p.id.to_string())
                .cell(&p.name)
                .cell(&p.version)
                .cell(&p.organization)
                .cell(p.status.to_string())
                .cell(format!("{}%", p.progress_percentage))
                .cell(p.created.format("%Y-%m-%d").to_string())
        })
        .collect();

    let mut formatter = TableFormatter::new(COLUMNS, "project");
    if global.quiet {
        formatter = formatter.without_summary();
    }
    formatter.print(&rows, format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let project = resolve_project(&store, &args.id)?;

    match global.format.resolve(config.default_format.as_deref()) {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&project).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&project).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Id => {
            println!("{}", project.id);
            return Ok(());
        }
        _ => {}
    }

    let framework_doc = store.framework_document(&project.id)?;
    let supporting = store.list_documents(&project.id, Some(DocumentRole::Supporting))?;
    let analyses = store.list_analyses(&project.id)?;

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&project.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&project.name).yellow());
    println!("{}: {}", style("Version").bold(), project.version);
    println!("{}: {}", style("Published").bold(), project.publication_time);
    println!("{}: {}", style("Organization").bold(), project.organization);
    println!(
        "{}: {} ({}%)",
        style("Status").bold(),
        project.status,
        project.progress_percentage
    );
    println!("{}", style("─".repeat(60)).dim());

    match &framework_doc {
        Some(doc) => println!(
            "{}: {} ({} indicators)",
            style("Indicators").bold(),
            doc.original_filename,
            doc.indicator_count
        ),
        None => println!("{}: {}", style("Indicators").bold(), style("(none)").dim()),
    }
    println!("{}: {}", style("Supporting documents").bold(), supporting.len());
    println!(
        "{}: {}",
        style("Legal framework").bold(),
        project.legal_framework_id.as_deref().unwrap_or("-")
    );
    if let Some(latest) = analyses.first() {
        let score = latest
            .summary
            .as_ref()
            .map(|s| format!("{:.1}%", s.compliance_score))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: {} ({}, score {})",
            style("Latest analysis").bold(),
            latest.created.format("%Y-%m-%d %H:%M"),
            latest.status,
            score
        );
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Owner").dim(),
        project.user_id,
        style("Created").dim(),
        project.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}
