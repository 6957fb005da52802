//! # Clone Command Implementation
//!
//! Clones `{base_url}/{team}-{template}` for every team and template in the
//! plan into `{root}/{team}/{team}-{template}`, then runs the plan's tasks
//! against each repository. Repositories that are already present and track
//! the same remote are reported as up to date rather than cloned again.

use anyhow::Result;
use clap::Args;

use super::{run_batch, PlanArgs};
use bulk_repo::output::OutputConfig;
use bulk_repo::spec::Batch;

/// Clone every team's copy of every template
#[derive(Args, Debug)]
pub struct CloneArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, out: &OutputConfig) -> Result<i32> {
    let loaded = args.plan.load()?;
    let teams = loaded.plan.teams()?;

    let batch = Batch::clone_from_templates(
        &loaded.root,
        &loaded.plan.base_url,
        &teams,
        &loaded.plan.templates,
        loaded.plan.branch.as_deref(),
    )?;

    run_batch(&args.plan, loaded, &batch, out)
}
