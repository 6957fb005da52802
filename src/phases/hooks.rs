//! Hook Task Runner
//!
//! Runs every registered task, in registration order, against one
//! repository. Each invocation is isolated: an `Err` return, a panic, or a
//! result without a name is recorded as an `Error` result naming the task,
//! and the runner moves on to the next task.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, warn};

use super::panic_message;
use crate::task::{Task, TaskRegistry, TaskResult, TaskStatus};

/// Run all tasks in `registry` against `path`.
pub fn run_tasks<C>(registry: &TaskRegistry<C>, path: &Path, context: &C) -> Vec<TaskResult>
where
    C: ?Sized,
{
    registry
        .iter()
        .map(|task| run_task(task, path, context))
        .collect()
}

/// Run one task, converting any misbehavior into an `Error` result.
pub fn run_task<C>(task: &dyn Task<C>, path: &Path, context: &C) -> TaskResult
where
    C: ?Sized,
{
    let name = task.name().to_string();
    debug!("running task {} on {}", name, path.display());

    let attempt = panic::catch_unwind(AssertUnwindSafe(|| task.execute(path, context)));

    let result = match attempt {
        Ok(Ok(result)) if result.name().trim().is_empty() => TaskResult::error(
            &name,
            format!("task '{}' returned a result without a name", name),
        ),
        Ok(Ok(result)) => result,
        Ok(Err(e)) => TaskResult::error(&name, format!("task '{}' failed: {:#}", name, e)),
        Err(payload) => TaskResult::error(
            &name,
            format!(
                "task '{}' panicked: {}",
                name,
                panic_message(payload.as_ref())
            ),
        ),
    };

    if result.status() == TaskStatus::Error {
        warn!("{} on {}: {}", result.name(), path.display(), result.message());
    }

    result
}
