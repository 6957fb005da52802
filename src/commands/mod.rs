//! # CLI Commands
//!
//! One module per subcommand. `clone` and `push` share the plan loading and
//! batch running in this module; they differ only in how the batch is built.

pub mod clone;
pub mod completions;
pub mod push;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::info;

use bulk_repo::builtin_tasks::registry_from_config;
use bulk_repo::config::{self, EngineConfig, Plan};
use bulk_repo::output::{render_json, render_text, OutputConfig};
use bulk_repo::phases::Engine;
use bulk_repo::precheck::{Connectivity, RemoteConnectivity, SkipPrecheck};
use bulk_repo::spec::Batch;
use bulk_repo::task::TaskRegistry;

/// Output format for the batch report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per repository plus a summary
    Text,
    /// The whole outcome as JSON
    Json,
}

/// Arguments shared by `clone` and `push`
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the plan file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "BULK_REPO_PLAN",
        default_value = "bulk-repo.yaml"
    )]
    pub plan: PathBuf,

    /// Number of repositories processed at once (overrides the plan)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Directory that holds the local working trees (overrides the plan)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Skip the connectivity check before the batch starts
    #[arg(long)]
    pub no_precheck: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// A loaded plan with command-line overrides applied.
pub(crate) struct Loaded {
    pub plan: Plan,
    pub engine: EngineConfig,
    pub root: PathBuf,
}

impl PlanArgs {
    pub(crate) fn load(&self) -> Result<Loaded> {
        let plan = config::from_file(&self.plan)
            .with_context(|| format!("Failed to load plan {}", self.plan.display()))?;

        let mut engine = plan.engine_config();
        if let Some(workers) = self.workers {
            engine.workers = usize::from(workers);
        }
        let root = self.root.clone().unwrap_or_else(|| plan.root.clone());

        Ok(Loaded { plan, engine, root })
    }
}

/// Run `batch` and print the outcome. Returns the exit code for the verdict.
pub(crate) fn run_batch(
    args: &PlanArgs,
    loaded: Loaded,
    batch: &Batch,
    out: &OutputConfig,
) -> Result<i32> {
    let Loaded { plan, engine, .. } = loaded;

    let connectivity: Box<dyn Connectivity> = if args.no_precheck {
        Box::new(SkipPrecheck)
    } else {
        Box::new(RemoteConnectivity::for_url(
            &plan.base_url,
            engine.precheck_timeout,
        )?)
    };

    let tasks: TaskRegistry<str> =
        registry_from_config(&plan.tasks).context("Invalid task configuration")?;
    info!("plan loaded from {}", args.plan.display());

    let engine = Engine::new(engine, connectivity)?;
    let outcome = engine.run(batch, &tasks, plan.base_url.as_str());

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&outcome, out)),
        OutputFormat::Json => println!("{}", render_json(&outcome)?),
    }

    Ok(outcome.verdict().exit_code())
}
