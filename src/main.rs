//! # Bulk Repo CLI
//!
//! This is the binary entry point for the `bulk-repo` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning the batch verdict into the process exit status.
//!
//! The engine itself lives in the `lib.rs` library crate; the binary only
//! loads the plan, builds the batch and renders the outcome.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let code = cli.execute()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
