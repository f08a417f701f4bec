//! `sbench doc` command - Supporting documents for an analysis

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::ingest::discard_object;
use crate::cli::helpers::{file_name_of, open_context, read_upload, resolve_project, truncate_str};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::storage::object_key_now;
use crate::core::{CurrentUser, LocalObjectStore, ObjectStore};
use crate::entities::document::check_upload;
use crate::entities::{DocumentRecord, DocumentRole};

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// Attach a supporting document to a project
    Attach(AttachArgs),

    /// List a project's documents
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Document to attach
    pub file: PathBuf,

    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// What the document contains
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Include the framework spreadsheet
    #[arg(long)]
    pub all: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("role", "ROLE", 10),
    ColumnDef::new("file", "FILE", 30),
    ColumnDef::new("size", "SIZE", 10),
    ColumnDef::new("description", "DESCRIPTION", 30),
    ColumnDef::new("created", "CREATED", 10),
];

pub fn run(cmd: DocCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DocCommands::Attach(args) => run_attach(args, global),
        DocCommands::List(args) => run_list(args, global),
    }
}

fn run_attach(args: AttachArgs, global: &GlobalOpts) -> Result<()> {
    let (workspace, store, config) = open_context(global)?;
    let project = resolve_project(&store, &args.project)?;
    let user = CurrentUser::resolve(&config);

    let bytes = read_upload(&args.file)?;
    let filename = file_name_of(&args.file);
    check_upload(&filename, bytes.len() as u64)?;

    let objects = LocalObjectStore::new(workspace.objects_dir());
    let stored = objects.put(&object_key_now(&user, &project.id, &filename), &bytes)?;

    let doc = DocumentRecord::new(
        project.id.clone(),
        user.as_str(),
        DocumentRole::Supporting,
        &filename,
        stored.size,
        stored.sha256,
        stored.key,
    )
    .with_description(args.description);
    if let Err(e) = store.insert_document(&doc) {
        discard_object(&objects, &doc.storage_path);
        return Err(e.into());
    }

    if global.format == OutputFormat::Id {
        println!("{}", doc.id);
    } else if !global.quiet {
        println!(
            "{} Attached {} to project {}",
            style("✓").green(),
            style(&doc.original_filename).yellow(),
            style(&project.id).cyan()
        );
        println!("   {}", style(&doc.storage_path).dim());
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let project = resolve_project(&store, &args.project)?;
    let role = if args.all {
        None
    } else {
        Some(DocumentRole::Supporting)
    };
    let docs = store.list_documents(&project.id, role)?;

    let format = global.format.resolve(config.default_format.as_deref());
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&docs).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&docs).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    if docs.is_empty() {
        if !global.quiet && format == OutputFormat::Auto {
            println!("No documents found.");
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = docs
        .iter()
        .map(|d| {
            TableRow::new(d.id.to_string())
                .cell(d.id.to_string())
                .cell(d.role.to_string())
                .cell(&d.original_filename)
                .cell(format_size(d.file_size))
                .cell(truncate_str(d.description.as_deref().unwrap_or("-"), 60))
                .cell(d.created.format("%Y-%m-%d").to_string())
        })
        .collect();

    let mut formatter = TableFormatter::new(COLUMNS, "document");
    if global.quiet {
        formatter = formatter.without_summary();
    }
    formatter.print(&rows, format);
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
