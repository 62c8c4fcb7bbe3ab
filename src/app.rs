// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod plugins;
pub mod safelist;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

use self::cli::{Cli, Command};
use self::config::{config_dir, find_config, load, CONFIG_FILE_NAME};
use self::formatter::OutputGenerator;
use self::plugins::resolve_plugins;
use self::scanner::content_files;

/// Parses arguments, loads the document and runs the requested command.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);

    // 2. Locate the document
    let path = resolve_config_path(args.config)?;
    let base_dir = config_dir(&path);

    // 3. Load it; every command needs a valid record
    let record = load(&path)?;

    // 4. Run the command
    let output = match args.command {
        Command::Check => {
            let plugins = resolve_plugins(&record, &base_dir)?;
            let files = content_files(&record, &base_dir)?;
            if files.is_empty() {
                log::warn!("⚠️ No content files matched in {}", base_dir.display());
            }
            OutputGenerator::generate_summary(&path, &record, &plugins, &files)
        }
        Command::Content => {
            let files = content_files(&record, &base_dir)?;
            OutputGenerator::generate_content(&files)
        }
        Command::Plugins => {
            let plugins = resolve_plugins(&record, &base_dir)?;
            OutputGenerator::generate_plugins(&plugins)
        }
        Command::Safelist { classes } => OutputGenerator::generate_safelist(&record, &classes),
        Command::Print => record
            .to_toml_string()
            .context("Failed to serialize configuration")?,
    };

    // 5. Print to Stdout
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

/// `--config` if given, otherwise the nearest stylekit.toml above the current directory.
fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    find_config(&current_dir).with_context(|| {
        format!(
            "No {} found in {} or its parents (use --config)",
            CONFIG_FILE_NAME,
            current_dir.display()
        )
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
