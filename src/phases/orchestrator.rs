//! Orchestrator for a complete batch run
//!
//! `Engine` ties the phases together:
//! 1. Connectivity precheck (once, before any worker starts)
//! 2. Bounded parallel execution of every spec on a dedicated worker pool
//! 3. Hook tasks for each repository, on the same worker, right after its
//!    own operation reached a non-failed outcome
//! 4. Aggregation into a report ordered like the input batch

use log::{error, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::aggregate::ResultTable;
use super::{executor, hooks};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::precheck::Connectivity;
use crate::report::BatchOutcome;
use crate::repository::{DefaultGitOperations, GitOperations};
use crate::spec::Batch;
use crate::task::TaskRegistry;

/// The bulk repository operation engine.
pub struct Engine {
    config: EngineConfig,
    git_ops: Box<dyn GitOperations>,
    connectivity: Box<dyn Connectivity>,
    pool: ThreadPool,
}

impl Engine {
    /// Creates an engine that shells out to the git program named in
    /// `config`.
    pub fn new(config: EngineConfig, connectivity: Box<dyn Connectivity>) -> Result<Self> {
        let git_ops = DefaultGitOperations::new(config.git_program.clone(), config.clone_depth);
        Self::with_operations(config, Box::new(git_ops), connectivity)
    }

    /// Creates an engine with a custom `GitOperations` implementation.
    pub fn with_operations(
        config: EngineConfig,
        git_ops: Box<dyn GitOperations>,
        connectivity: Box<dyn Connectivity>,
    ) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .thread_name(|index| format!("bulk-repo-worker-{}", index))
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })?;

        Ok(Self {
            config,
            git_ops,
            connectivity,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `batch`, then `tasks` against every repository that synced.
    ///
    /// Never fails because of a single repository or task. The only
    /// non-report outcome is `BatchOutcome::Fatal`, returned when the
    /// precheck fails; in that case no git command and no task has run.
    pub fn run<C>(&self, batch: &Batch, tasks: &TaskRegistry<C>, context: &C) -> BatchOutcome
    where
        C: Sync + ?Sized,
    {
        if let Err(e) = self.connectivity.check() {
            error!("precheck failed, aborting batch of {}: {}", batch.len(), e);
            return BatchOutcome::Fatal {
                reason: e.to_string(),
            };
        }

        info!(
            "running {} operations with {} workers and {} tasks",
            batch.len(),
            self.pool.current_num_threads(),
            tasks.len()
        );

        let table = ResultTable::new(batch.len());
        let git = self.git_ops.as_ref();

        self.pool.install(|| {
            batch
                .specs()
                .par_iter()
                .enumerate()
                .with_max_len(1)
                .for_each(|(index, spec)| {
                    let status = executor::execute(git, spec);
                    let results = if status.outcome().is_success() {
                        hooks::run_tasks(tasks, spec.path(), context)
                    } else {
                        Vec::new()
                    };
                    table.record_status(index, status);
                    table.record_results(index, results);
                });
        });

        let report = table.into_report(batch);
        let (completed, up_to_date, failed) = report.outcome_counts();
        info!(
            "batch finished: {} completed, {} up to date, {} failed, verdict {}",
            completed,
            up_to_date,
            failed,
            report.verdict()
        );

        BatchOutcome::Finished { report }
    }
}
