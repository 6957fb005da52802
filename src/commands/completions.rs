//! # Completions Command Implementation
//!
//! Prints a shell completion script for `bulk-repo` to stdout.
//!
//! ```bash
//! bulk-repo completions bash > ~/.local/share/bash-completion/completions/bulk-repo
//! bulk-repo completions zsh > ~/.zfunc/_bulk-repo
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

fn write_completions(shell: Shell, buf: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "bulk-repo", buf);
    buf.flush()?;
    Ok(())
}
