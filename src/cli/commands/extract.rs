//! `sbench extract` command - Extract indicators from a framework document
//!
//! The extractor runs on a tokio runtime with a deadline; Ctrl-C abandons
//! it and nothing from the attempt is kept.

use console::style;
use miette::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::commands::ingest::{persist_confirmed, print_issues};
use crate::cli::helpers::{file_name_of, open_context, read_upload, resolve_project, runtime};
use crate::cli::GlobalOpts;
use crate::core::CurrentUser;
use crate::entities::document::check_upload;
use crate::ingest::IngestionSession;
use crate::services::{extract_with_deadline, ExtractionInput, IndicatorExtractor, MockExtractor};

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Framework document (pdf, doc, docx, txt, ...)
    pub file: PathBuf,

    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Seconds before extraction is abandoned (default: extraction_timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show extracted indicators without saving them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ExtractArgs, global: &GlobalOpts) -> Result<()> {
    let (workspace, mut store, config) = open_context(global)?;
    let mut project = resolve_project(&store, &args.project)?;
    let user = CurrentUser::resolve(&config);

    let bytes = read_upload(&args.file)?;
    let filename = file_name_of(&args.file);
    check_upload(&filename, bytes.len() as u64)?;

    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.extraction_timeout());
    let extractor = MockExtractor::default();
    let input = ExtractionInput {
        filename: filename.clone(),
        bytes,
    };

    if !global.quiet {
        eprintln!(
            "Extracting indicators from {} with {} (Ctrl-C to cancel)...",
            style(&filename).yellow(),
            extractor.name()
        );
    }

    let rt = runtime()?;
    let indicators = rt.block_on(async {
        let cancel = async {
            // A failed signal listener must not count as a cancellation
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        extract_with_deadline(&extractor, &input, timeout, cancel).await
    })?;

    let mut session = IngestionSession::new(config.validation_policy());
    session.load_extracted(indicators)?;

    if !global.quiet {
        println!(
            "{} Extracted {} indicator(s)",
            style("✓").green(),
            style(session.indicators().len()).cyan()
        );
        for ind in session.indicators() {
            println!("  {}  {}", style(&ind.id).cyan(), ind.text);
        }
    }
    print_issues(&session, global.quiet);

    let result = session.confirm()?;
    if args.dry_run {
        return Ok(());
    }

    persist_confirmed(
        &workspace,
        &mut store,
        &user,
        &mut project,
        &filename,
        &input.bytes,
        &result.indicators,
    )?;

    if !global.quiet {
        println!(
            "{} Saved {} indicator(s) to project {}",
            style("✓").green(),
            style(result.indicators.len()).cyan(),
            style(&project.id).cyan()
        );
    }
    Ok(())
}
