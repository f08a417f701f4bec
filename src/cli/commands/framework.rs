//! `sbench framework` command - Legal frameworks available for analysis

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_context;
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum FrameworkCommands {
    /// List legal frameworks
    List(ListArgs),

    /// Show one legal framework
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include frameworks that are no longer offered
    #[arg(long)]
    pub all: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Framework ID (e.g. eu-csrd)
    pub id: String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 40),
    ColumnDef::new("category", "CATEGORY", 14),
    ColumnDef::new("jurisdiction", "JURISDICTION", 18),
    ColumnDef::new("effective", "EFFECTIVE", 10),
];

pub fn run(cmd: FrameworkCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FrameworkCommands::List(args) => run_list(args, global),
        FrameworkCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let frameworks = store.list_legal_frameworks(args.all)?;

    let format = global.format.resolve(config.default_format.as_deref());
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&frameworks).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&frameworks).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let rows: Vec<TableRow> = frameworks
        .iter()
        .map(|f| {
            TableRow::new(f.id.clone())
                .cell(f.id.clone())
                .cell(f.name.clone())
                .cell(f.category.clone())
                .cell(f.jurisdiction.clone())
                .cell(f.effective_date.clone().unwrap_or_else(|| "-".to_string()))
        })
        .collect();

    let mut formatter = TableFormatter::new(COLUMNS, "framework");
    if global.quiet {
        formatter = formatter.without_summary();
    }
    formatter.print(&rows, format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let framework = store.get_legal_framework(&args.id)?.ok_or_else(|| {
        miette::miette!(
            help = "Run 'sbench framework list' to see available frameworks",
            "No legal framework '{}'",
            args.id
        )
    })?;

    match global.format.resolve(config.default_format.as_deref()) {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&framework).into_diagnostic()?),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&framework).into_diagnostic()?)
        }
        OutputFormat::Id => println!("{}", framework.id),
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&framework.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&framework.name).yellow());
            println!("{}: {}", style("Category").bold(), framework.category);
            println!("{}: {}", style("Jurisdiction").bold(), framework.jurisdiction);
            if let Some(date) = &framework.effective_date {
                println!("{}: {}", style("Effective").bold(), date);
            }
            if let Some(version) = &framework.version {
                println!("{}: {}", style("Version").bold(), version);
            }
            if !framework.is_active {
                println!("{}: {}", style("Status").bold(), style("inactive").red());
            }
            println!("{}", style("─".repeat(60)).dim());
            if !framework.description.is_empty() {
                println!("{}", framework.description);
            }
        }
    }
    Ok(())
}
