//! # schemaloader CLI
//!
//! Command-line interface for schemaloader.
//!
//! Reads model descriptors from JSON files or directories and prints the
//! `CREATE TABLE` script for the selected dialect.
//!
//! ```text
//! schemaloader --dialect mssql --delimiter $'\nGO' models/
//! ```
//!
//! Options are merged in this order: defaults, `--config` file, flags.
//! `SCHEMALOADER_DIALECT` stands in for `--dialect` when the flag is absent.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use schemaloader_codegen::{Loader, LoaderConfig, TableOrdering};
use schemaloader_core::Dialect;
use schemaloader_ir::{ModelDescriptor, ModelSource, load_models_from_path};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

// Re-export dependencies for use in main.rs
pub use schemaloader_codegen;
pub use schemaloader_core;
pub use schemaloader_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "schemaloader")]
#[command(about = "Derive CREATE TABLE statements from model descriptors")]
#[command(version)]
pub struct Args {
    /// Model files (JSON) or directories to scan for them
    #[arg(required = true, value_name = "MODELS")]
    pub models: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target dialect: postgres, mysql, sqlite, mssql or oracle
    #[arg(short, long, env = "SCHEMALOADER_DIALECT", value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Text written after every statement
    #[arg(long, value_name = "TEXT")]
    pub delimiter: Option<String>,

    /// Model to use as a join table (deprecated)
    #[arg(long = "join-table", value_name = "MODEL")]
    pub join_tables: Vec<String>,

    /// Order of independent tables: name or supply
    #[arg(long, value_parser = parse_ordering)]
    pub ordering: Option<TableOrdering>,

    /// Root that source paths are made relative to
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Emit identifiers without quotes
    #[arg(long)]
    pub no_quote: bool,

    /// Write the script to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    value.parse().map_err(|e: schemaloader_core::EngineError| e.to_string())
}

fn parse_ordering(value: &str) -> Result<TableOrdering, String> {
    value.parse().map_err(|e: schemaloader_core::EngineError| e.to_string())
}

impl Args {
    /// The effective loader configuration
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => LoaderConfig::from_file(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => LoaderConfig::default(),
        };

        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(delimiter) = &self.delimiter {
            config.delimiter = Some(delimiter.clone());
        }
        if let Some(ordering) = self.ordering {
            config.ordering = ordering;
        }
        if let Some(root) = &self.project_root {
            config.project_root = Some(root.clone());
        }
        if self.no_quote {
            config.quote_identifiers = false;
        }
        config.join_tables.extend(self.join_tables.iter().cloned());

        Ok(config)
    }
}

// ============================================================================
// Running
// ============================================================================

/// Produce the script described by the arguments
pub fn generate(args: &Args) -> Result<String> {
    let config = args.loader_config()?;
    debug!(?config, "effective configuration");

    let mut models: Vec<ModelDescriptor> = Vec::new();
    for path in &args.models {
        let loaded = load_models_from_path(path)
            .with_context(|| format!("failed to read models from {}", path.display()))?;
        models.extend(loaded);
    }

    let sources: Vec<&dyn ModelSource> = models.iter().map(|m| m as &dyn ModelSource).collect();
    let loader = Loader::from_config(config)?;
    let sql = loader
        .load(&sources)
        .with_context(|| format!("failed to derive {} schema", loader.dialect()))?;
    Ok(sql)
}

/// Generate and deliver the script to stdout or the output file
pub fn run(args: &Args) -> Result<()> {
    let sql = generate(args)?;

    match &args.output {
        Some(path) => std::fs::write(path, &sql)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{sql}"),
    }
    Ok(())
}

/// Parse the process arguments and run, reporting failures on stderr
pub fn main_with_args() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
