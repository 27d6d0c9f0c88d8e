//! schemaloader
//!
//! Derives `CREATE TABLE` statements for several SQL dialects from model
//! descriptors.
//!
//! This is the main entry point for the command-line tool. SQL goes to
//! stdout; logs go to stderr and are filtered with `RUST_LOG`.

use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = schemaloader_cli::VERSION, "starting schemaloader");

    schemaloader_cli::main_with_args()
}
