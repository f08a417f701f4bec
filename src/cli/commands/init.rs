//! `sbench init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::workspace::{Workspace, WorkspaceError};
use crate::core::Store;
use crate::entities::legal_framework::builtin_catalog;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the workspace config even if .sbench/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let workspace = match Workspace::init(&path, args.force) {
        Ok(ws) => ws,
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} sbench workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("sbench init --force").yellow());
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    let mut store = Store::open(&workspace)?;
    let seeded = store.seed_legal_frameworks(&builtin_catalog()?)?;

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Initialized sbench workspace at {}",
        style("✓").green(),
        style(workspace.root().display()).cyan()
    );
    println!();
    println!("Created workspace structure:");
    println!("  {}/", style(".sbench").blue());
    println!("    config.yaml      {}", style("workspace configuration").dim());
    println!("    store.db         {}", style("projects, indicators, analyses").dim());
    println!("    objects/         {}", style("uploaded documents").dim());
    if seeded > 0 {
        println!();
        println!("Seeded {} legal framework(s)", style(seeded).cyan());
    }
    println!();
    println!("Next steps:");
    println!(
        "  {} Describe the framework you are benchmarking",
        style("sbench project new").yellow()
    );
    println!(
        "  {} Load its indicators from a spreadsheet",
        style("sbench ingest FILE --project ID").yellow()
    );
    Ok(())
}
