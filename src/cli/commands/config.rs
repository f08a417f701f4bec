//! `sbench config` command - Configuration management
//!
//! Provides commands to view and modify sbench configuration.

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::helpers::open_workspace;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::ingest::DuplicateReporting;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only workspace-level config
    #[arg(long = "workspace-only", conflicts_with = "global_only")]
    pub workspace_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (see `sbench config keys`)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of workspace config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of workspace config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only workspace config path
    #[arg(long = "workspace-only", conflicts_with = "global_only")]
    pub workspace_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("user", "Name recorded on projects, documents, and analyses"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, csv, md, id)",
    ),
    (
        "duplicates_are_blocking",
        "Whether duplicate indicator IDs block confirmation (true/false)",
    ),
    (
        "duplicate_reporting",
        "Report duplicates per_row or once in aggregate",
    ),
    (
        "extraction_timeout_secs",
        "Seconds before document extraction is abandoned",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path(args) => run_path(args, global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = open_workspace(global).ok();
    let config = Config::load_for(workspace.as_ref());

    if let Some(key) = &args.key {
        check_key(key)?;
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.workspace_only {
        show_file("Workspace config:", &workspace_config_path(global)?)
    } else if args.global_only {
        show_file("Global config:", &global_config_path()?)
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();
        for (key, _) in VALID_KEYS {
            print_config_value(key, config.get(key).as_deref());
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (SBENCH_USER, SBENCH_DUPLICATES_BLOCKING, SBENCH_DUPLICATE_REPORTING, SBENCH_EXTRACTION_TIMEOUT)");
        println!("  2. Workspace config (.sbench/config.yaml)");
        println!("  3. Global config (~/.config/sbench/config.yaml)");
        Ok(())
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let value = typed_value(&args.key, &args.value)?;
    let config_path = if args.global {
        global_config_path()?
    } else {
        workspace_config_path(global)?
    };

    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(args.key.clone(), value);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "workspace" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    check_key(&args.key)?;
    let config_path = if args.global {
        global_config_path()?
    } else {
        workspace_config_path(global)?
    };

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    if config_map
        .remove(args.key.as_str())
        .is_none()
    {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "workspace" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );
    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    if args.workspace_only {
        println!("{}", workspace_config_path(global)?.display());
        return Ok(());
    }
    if args.global_only {
        println!("{}", global_config_path()?.display());
        return Ok(());
    }

    let global_path = global_config_path()?;
    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    print_exists(global_path.exists(), 9);

    println!();
    match workspace_config_path(global) {
        Ok(path) => {
            println!("  {} {}", style("Workspace:").cyan(), path.display());
            print_exists(path.exists(), 12);
        }
        Err(_) => println!(
            "  {} {}",
            style("Workspace:").cyan(),
            style("(not in an sbench workspace)").dim()
        ),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<26} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'sbench config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn workspace_config_path(global: &GlobalOpts) -> Result<PathBuf> {
    Ok(open_workspace(global)?.config_path())
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "Run 'sbench config keys' to list valid keys",
            "Unknown configuration key '{}'",
            key
        ))
    }
}

/// Convert a command-line value to the YAML type the key is read as
fn typed_value(key: &str, raw: &str) -> Result<serde_yml::Value> {
    check_key(key)?;
    let raw = raw.trim();
    let value = match key {
        "duplicates_are_blocking" => match raw.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => serde_yml::Value::Bool(true),
            "false" | "no" | "off" | "0" => serde_yml::Value::Bool(false),
            _ => return Err(miette::miette!("'{}' is not a boolean (use true or false)", raw)),
        },
        "duplicate_reporting" => {
            let mode: DuplicateReporting = raw.parse().map_err(|e: String| miette::miette!("{}", e))?;
            serde_yml::Value::String(mode.to_string())
        }
        "extraction_timeout_secs" => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| miette::miette!("'{}' is not a number of seconds", raw))?;
            if secs == 0 {
                return Err(miette::miette!("extraction_timeout_secs must be at least 1"));
            }
            serde_yml::Value::Number(secs.into())
        }
        "default_format" => {
            OutputFormat::from_str(raw, true).map_err(|e| miette::miette!("{}", e))?;
            serde_yml::Value::String(raw.to_lowercase())
        }
        _ => serde_yml::Value::String(raw.to_string()),
    };
    Ok(value)
}

/// Read a config file as a YAML mapping; missing or empty files are empty mappings
fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content).into_diagnostic()? {
        serde_yml::Value::Mapping(map) => Ok(map),
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        _ => Err(miette::miette!(
            "Config file is not a mapping: {}",
            path.display()
        )),
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_exists(exists: bool, indent: usize) {
    let label = if exists {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("  {:indent$}{}", "", label, indent = indent);
}

fn show_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}
