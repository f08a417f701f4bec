//! `sbench analyze` command - Benchmark confirmed indicators against a legal framework

use console::{style, Term};
use miette::{IntoDiagnostic, Result};
use std::time::Instant;

use crate::cli::helpers::{open_context, resolve_project, runtime};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::CurrentUser;
use crate::entities::{AnalysisInput, AnalysisRecord, DocumentRole};
use crate::services::{AnalysisRequest, ComplianceAnalyzer, MockAnalyzer};

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Project ID or unique prefix
    #[arg(long, short = 'p')]
    pub project: String,

    /// Legal framework ID (see `sbench framework list`)
    #[arg(long)]
    pub framework: String,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let (_, store, config) = open_context(global)?;
    let mut project = resolve_project(&store, &args.project)?;
    let user = CurrentUser::resolve(&config);

    let framework_doc = store.framework_document(&project.id)?.ok_or_else(|| {
        miette::miette!(
            help = "Run 'sbench ingest FILE --project ID' first",
            "Project {} has no confirmed indicators",
            project.id
        )
    })?;
    let indicators = store.list_indicators(&project.id)?;

    let framework = store
        .get_legal_framework(&args.framework)?
        .filter(|f| f.is_active)
        .ok_or_else(|| {
            miette::miette!(
                help = "Run 'sbench framework list' to see available frameworks",
                "No active legal framework '{}'",
                args.framework
            )
        })?;

    let supporting = store
        .list_documents(&project.id, Some(DocumentRole::Supporting))?
        .len();

    project.select_legal_framework(&framework.id);
    store.update_project(&project)?;

    let mut record = AnalysisRecord::start(
        project.id.clone(),
        user.as_str(),
        AnalysisInput {
            document_id: framework_doc.id.clone(),
            legal_framework_id: framework.id.clone(),
            supporting_documents: supporting,
        },
    );
    store.insert_analysis(&record)?;

    let analyzer = MockAnalyzer::default();
    let request = AnalysisRequest {
        indicators,
        legal_framework: framework.clone(),
        supporting_documents: supporting,
    };

    let term = Term::stderr();
    let show_progress = !global.quiet && term.is_term();
    let started = Instant::now();

    let rt = runtime()?;
    let outcome = rt.block_on(async {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let progress = async {
            while let Some(pct) = rx.recv().await {
                if show_progress {
                    let _ = term.clear_line();
                    let _ = term.write_str(&format!(
                        "Analyzing against {}... {:>3}%",
                        framework.name, pct
                    ));
                }
            }
            if show_progress {
                let _ = term.clear_line();
            }
        };
        let (result, ()) = tokio::join!(analyzer.analyze(&request, Some(tx)), progress);
        result
    });
    let seconds = started.elapsed().as_secs_f64();

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            record.fail(e.to_string(), seconds);
            store.update_analysis(&record)?;
            return Err(e.into());
        }
    };

    record.complete(summary.clone(), Some(analyzer.model().to_string()), seconds);
    store.update_analysis(&record)?;
    project.complete();
    store.update_project(&project)?;

    match global.format.resolve(config.default_format.as_deref()) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&record).into_diagnostic()?),
        OutputFormat::Id => println!("{}", record.id),
        _ => {
            println!(
                "{} Analysis {} completed",
                style("✓").green(),
                style(&record.id).cyan()
            );
            println!();
            println!(
                "{}: {:.1}% - {}",
                style("Compliance score").bold(),
                summary.compliance_score,
                style(summary.level().label()).yellow()
            );
            println!("  Total indicators:      {}", summary.total_indicators);
            println!("  Compliant indicators:  {}", summary.compliant_indicators);
            println!("  Gaps identified:       {}", summary.gaps_identified);
            println!("  Critical gaps:         {}", summary.critical_gaps);
            println!(
                "  Supporting documents:  {}",
                summary.supporting_documents_processed
            );
            if !global.quiet {
                println!();
                println!(
                    "Next: {}",
                    style(format!("sbench report summary --project {}", project.id)).yellow()
                );
            }
        }
    }
    Ok(())
}
