//! # Push Command Implementation
//!
//! Pushes each local template repository `{templates_dir}/{template}` to
//! `{base_url}/{team}-{template}` for every team in the plan. The target
//! repositories must already exist on the platform; this command does not
//! create them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{run_batch, PlanArgs};
use bulk_repo::output::OutputConfig;
use bulk_repo::spec::Batch;

/// Push local templates to every team's copy
#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Directory holding one local git repository per template
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub templates_dir: PathBuf,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs, out: &OutputConfig) -> Result<i32> {
    let loaded = args.plan.load()?;
    let teams = loaded.plan.teams()?;

    let batch = Batch::push_from_templates(
        &loaded.root,
        &loaded.plan.base_url,
        &args.templates_dir,
        &teams,
        &loaded.plan.templates,
        loaded.plan.branch.as_deref(),
    )?;

    run_batch(&args.plan, loaded, &batch, out)
}
