//! `sbench ingest` command - Load an indicator spreadsheet into a project

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cli::helpers::{file_name_of, open_context, read_upload, resolve_project};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::storage::object_key_now;
use crate::core::{CurrentUser, LocalObjectStore, ObjectStore, Store, Workspace};
use crate::entities::document::check_upload;
use crate::entities::{DocumentRecord, DocumentRole, FrameworkProject, Indicator, SemanticField};
use crate::ingest::{
    read_rows, DuplicateReporting, IngestError, IngestionSession, IssueSummary, ManualMapping,
    SheetFormat, StepOutcome,
};

#[derive(clap::Args, Debug)]
pub struct IngestArgs {
    /// Spreadsheet to ingest (csv, tsv, xlsx, xls, ods)
    pub file: PathBuf,

    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Header of the column holding indicator IDs (when it is not detected)
    #[arg(long, requires = "text_column")]
    pub id_column: Option<String>,

    /// Header of the column holding indicator text (when it is not detected)
    #[arg(long, requires = "id_column")]
    pub text_column: Option<String>,

    /// Spreadsheet row holding the headers (1-based, default: 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub header_row: Option<u64>,

    /// Correct a cell before confirming: ROW.FIELD=VALUE, ROW as listed in issues
    #[arg(long = "set", value_name = "ROW.FIELD=VALUE", value_parser = parse_edit)]
    pub edits: Vec<CellEdit>,

    /// Report duplicate IDs without blocking confirmation
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Report duplicate IDs once for the whole sheet instead of per row
    #[arg(long)]
    pub aggregate_duplicates: bool,

    /// Validate only; nothing is stored
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt; fail when required columns cannot be detected
    #[arg(long)]
    pub no_input: bool,
}

/// A `--set` correction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    /// Spreadsheet row (1-based, header is row 1)
    pub row: usize,
    pub field: SemanticField,
    pub value: String,
}

fn parse_edit(s: &str) -> Result<CellEdit, String> {
    let (target, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROW.FIELD=VALUE, got '{}'", s))?;
    let (row, field) = target
        .split_once('.')
        .ok_or_else(|| format!("expected ROW.FIELD before '=', got '{}'", target))?;
    let row: usize = row
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a row number", row.trim()))?;
    if row < 2 {
        return Err("row 1 is the header row; data starts at row 2".to_string());
    }
    Ok(CellEdit {
        row,
        field: field.parse()?,
        value: value.to_string(),
    })
}

const PREVIEW_ROWS: usize = 5;

const PREVIEW_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("row", "ROW", 6),
    ColumnDef::new("id", "ID", 14),
    ColumnDef::new("text", "INDICATOR TEXT", 50),
    ColumnDef::new("category", "CATEGORY", 16),
];

pub fn run(args: IngestArgs, global: &GlobalOpts) -> Result<()> {
    let (workspace, mut store, config) = open_context(global)?;
    let mut project = resolve_project(&store, &args.project)?;
    let user = CurrentUser::resolve(&config);

    let bytes = read_upload(&args.file)?;
    let filename = file_name_of(&args.file);
    check_upload(&filename, bytes.len() as u64)?;
    let format = SheetFormat::from_path(&args.file)?;

    let mut policy = config.validation_policy();
    if args.allow_duplicates {
        policy = policy.with_duplicates_blocking(false);
    }
    if args.aggregate_duplicates {
        policy = policy.with_duplicate_reporting(DuplicateReporting::Aggregate);
    }

    let mut session = IngestionSession::new(policy);
    let header_row = args.header_row.map(|n| n as usize - 1);

    if let StepOutcome::NeedsMapping { headers, missing } = session.ingest_bytes(&bytes, format)? {
        let mapping = match (&args.id_column, &args.text_column) {
            (Some(id), Some(text)) => {
                let mut m = ManualMapping::new(id, text);
                if let Some(row) = header_row {
                    m = m.with_header_row(row);
                }
                m
            }
            _ if args.no_input || !console::user_attended() => {
                report_missing_columns(&headers, &missing);
                return Err(missing_columns_error(&missing).into());
            }
            _ => prompt_mapping(&bytes, format, header_row.unwrap_or(0), &missing)?,
        };
        map_columns(&mut session, mapping)?;
    } else if (args.id_column.is_some() || args.header_row.is_some()) && !global.quiet {
        eprintln!(
            "{} Required columns were detected in row 1; column options ignored",
            style("!").yellow()
        );
    }

    for edit in &args.edits {
        let index = (0..session.indicators().len())
            .find(|&i| session.sheet_row(i) == Some(edit.row))
            .ok_or_else(|| miette::miette!("Row {} is not an indicator row of this sheet", edit.row))?;
        session.edit(index, edit.field, edit.value.clone())?;
    }

    let output = global.format.resolve(config.default_format.as_deref());
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot()).into_diagnostic()?);
    } else if !global.quiet {
        print_preview(&session);
    }
    print_issues(&session, global.quiet);

    let result = session.confirm()?;

    if args.dry_run {
        if !global.quiet {
            println!(
                "{} Dry run: {} indicator(s) would be saved to {}",
                style("✓").green(),
                style(result.indicators.len()).cyan(),
                style(&project.id).cyan()
            );
        }
        return Ok(());
    }

    let doc = persist_confirmed(
        &workspace,
        &mut store,
        &user,
        &mut project,
        &filename,
        &bytes,
        &result.indicators,
    )?;

    if !global.quiet {
        println!(
            "{} Saved {} indicator(s) from {} to project {}",
            style("✓").green(),
            style(result.indicators.len()).cyan(),
            style(&doc.original_filename).yellow(),
            style(&project.id).cyan()
        );
    }
    Ok(())
}

fn map_columns(session: &mut IngestionSession, mapping: ManualMapping) -> Result<StepOutcome> {
    match session.confirm_mapping(&mapping)? {
        StepOutcome::NeedsMapping { missing, .. } => Err(missing_columns_error(&missing).into()),
        parsed => Ok(parsed),
    }
}

fn missing_columns_error(missing: &BTreeSet<SemanticField>) -> IngestError {
    IngestError::MissingRequiredColumns {
        missing: missing
            .iter()
            .map(|f| f.canonical_header().to_string())
            .collect(),
    }
}

fn report_missing_columns(headers: &[String], missing: &BTreeSet<SemanticField>) {
    let found: Vec<&str> = headers
        .iter()
        .map(|h| h.as_str())
        .filter(|h| !h.is_empty())
        .collect();
    tracing::debug!(?missing, "no manual mapping available");
    eprintln!(
        "{} Headers found: {}",
        style("!").yellow(),
        if found.is_empty() {
            "(none)".to_string()
        } else {
            found.join(", ")
        }
    );
}

/// Ask which columns hold the ID and the text
fn prompt_mapping(
    bytes: &[u8],
    format: SheetFormat,
    header_row: usize,
    missing: &BTreeSet<SemanticField>,
) -> Result<ManualMapping> {
    let rows = read_rows(bytes, format)?;
    let headers: Vec<String> = rows
        .get(header_row)
        .map(|r| {
            r.iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if headers.len() < 2 {
        return Err(missing_columns_error(missing).into());
    }

    eprintln!(
        "{} Could not find {} in row {}",
        style("!").yellow(),
        missing
            .iter()
            .map(|f| format!("'{}'", f.canonical_header()))
            .collect::<Vec<_>>()
            .join(" and "),
        header_row + 1
    );

    let theme = ColorfulTheme::default();
    let id = Select::with_theme(&theme)
        .with_prompt("Which column holds the indicator ID?")
        .items(&headers[..])
        .default(0)
        .interact()
        .into_diagnostic()?;

    let remaining: Vec<&String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id)
        .map(|(_, h)| h)
        .collect();
    let text = Select::with_theme(&theme)
        .with_prompt("Which column holds the indicator text?")
        .items(&remaining[..])
        .default(0)
        .interact()
        .into_diagnostic()?;

    Ok(ManualMapping::new(headers[id].clone(), remaining[text].clone()).with_header_row(header_row))
}

fn print_preview(session: &IngestionSession) {
    let indicators = session.indicators();
    println!(
        "{} {} indicator(s) parsed",
        style("✓").green(),
        style(indicators.len()).cyan()
    );

    let rows: Vec<TableRow> = indicators
        .iter()
        .take(PREVIEW_ROWS)
        .enumerate()
        .map(|(i, ind)| {
            let row = session.sheet_row(i).map(|r| r.to_string()).unwrap_or_default();
            TableRow::new(ind.id.clone())
                .cell(row)
                .cell(ind.id.clone())
                .cell(ind.text.clone())
                .cell(ind.category.clone())
        })
        .collect();
    print!(
        "{}",
        TableFormatter::new(PREVIEW_COLUMNS, "indicator")
            .without_summary()
            .render(&rows, OutputFormat::Auto)
    );
    if indicators.len() > PREVIEW_ROWS {
        println!(
            "{}",
            style(format!("... and {} more", indicators.len() - PREVIEW_ROWS)).dim()
        );
    }
}

/// Print validation issues with spreadsheet row numbers
pub(crate) fn print_issues(session: &IngestionSession, quiet: bool) {
    let issues = session.issues();
    if issues.is_empty() {
        return;
    }

    let policy = session.policy();
    eprintln!();
    for issue in issues {
        let marker = if policy.is_blocking(issue) {
            style("✗").red()
        } else {
            style("!").yellow()
        };
        match issue.row_index.and_then(|i| session.sheet_row(i)) {
            Some(row) => eprintln!("{} Row {}: {}", marker, row, issue.message),
            None => eprintln!("{} {}", marker, issue.message),
        }
    }
    if !quiet {
        eprintln!();
        eprintln!(
            "{} {}",
            style("Validation:").bold(),
            IssueSummary::from_issues(issues)
        );
    }
}

/// Store the source file and the confirmed indicators
pub(crate) fn persist_confirmed(
    workspace: &Workspace,
    store: &mut Store,
    user: &CurrentUser,
    project: &mut FrameworkProject,
    filename: &str,
    bytes: &[u8],
    indicators: &[Indicator],
) -> Result<DocumentRecord> {
    let objects = LocalObjectStore::new(workspace.objects_dir());
    let previous = store.framework_document(&project.id)?;
    let stored = objects.put(&object_key_now(user, &project.id, filename), bytes)?;

    let doc = DocumentRecord::new(
        project.id.clone(),
        user.as_str(),
        DocumentRole::Framework,
        filename,
        stored.size,
        stored.sha256,
        stored.key,
    );
    project.mark_indicators_confirmed();
    if let Err(e) = store.save_confirmed_ingestion(project, &doc, indicators) {
        discard_object(&objects, &doc.storage_path);
        return Err(e.into());
    }

    // The replaced framework file is no longer referenced by any record
    if let Some(old) = previous.filter(|old| old.storage_path != doc.storage_path) {
        discard_object(&objects, &old.storage_path);
    }
    Ok(doc)
}

/// Remove an object that no record points to; failures are only logged
pub(crate) fn discard_object(objects: &impl ObjectStore, key: &str) {
    if let Err(e) = objects.delete(key) {
        tracing::warn!(key, error = %e, "could not remove unreferenced object");
    }
}
