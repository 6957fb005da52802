//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

use crate::commands;
use bulk_repo::output::OutputConfig;

/// Bulk Repo - Clone or push many student repositories at once
#[derive(Parser, Debug)]
#[command(name = "bulk-repo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes
    /// precedence when set
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone every team's copy of every template
    Clone(commands::clone::CloneArgs),

    /// Push local templates to every team's copy
    Push(commands::push::PushArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command and return the process exit code.
    pub fn execute(self) -> Result<i32> {
        init_logging(&self.log_level);
        let out = OutputConfig::from_env_and_flag(&self.color);
        debug!("color output: {}", out.use_color);

        match self.command {
            Commands::Clone(args) => commands::clone::execute(args, &out),
            Commands::Push(args) => commands::push::execute(args, &out),
            Commands::Completions(args) => {
                commands::completions::execute(args)?;
                Ok(0)
            }
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when driven from tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
