//! # Post-Operation Tasks
//!
//! A `Task` is a named unit of work that runs against a repository after it
//! has been cloned or pushed successfully. Tasks are the plugin boundary of
//! the engine: collaborators implement `Task` and register instances in a
//! `TaskRegistry`, which keeps them in registration order.
//!
//! Tasks are generic over the platform context `C` the caller passes to the
//! engine. The engine never inspects the context; it only lends it to each
//! task invocation.
//!
//! ## Example
//!
//! ```
//! use std::path::Path;
//! use bulk_repo::task::{Task, TaskRegistry, TaskResult};
//!
//! struct HasReadme;
//!
//! impl Task<()> for HasReadme {
//!     fn name(&self) -> &str {
//!         "has-readme"
//!     }
//!
//!     fn execute(&self, path: &Path, _ctx: &()) -> anyhow::Result<TaskResult> {
//!         if path.join("README.md").exists() {
//!             Ok(TaskResult::success(self.name(), "README.md present"))
//!         } else {
//!             Ok(TaskResult::warning(self.name(), "README.md missing"))
//!         }
//!     }
//! }
//!
//! let mut registry: TaskRegistry<()> = TaskRegistry::new();
//! registry.register(HasReadme);
//! assert_eq!(registry.names(), vec!["has-readme"]);
//! ```

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Severity of a task result. Ordered so that `max` gives the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Success => f.write_str("success"),
            TaskStatus::Warning => f.write_str("warning"),
            TaskStatus::Error => f.write_str("error"),
        }
    }
}

/// The outcome of one task invocation against one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    name: String,
    status: TaskStatus,
    message: String,
}

impl TaskResult {
    pub fn new(name: impl Into<String>, status: TaskStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    pub fn success(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, TaskStatus::Success, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, TaskStatus::Warning, message)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, TaskStatus::Error, message)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A post-operation task.
///
/// `execute` may block (network calls, subprocesses). Returning `Err` or
/// panicking is tolerated: the hook runner turns either into an `Error`
/// result named after the task and moves on.
pub trait Task<C: ?Sized>: Send + Sync {
    /// Stable name used in reports and diagnostics.
    fn name(&self) -> &str;

    fn execute(&self, path: &Path, context: &C) -> anyhow::Result<TaskResult>;
}

/// Ordered collection of registered tasks.
pub struct TaskRegistry<C: ?Sized> {
    tasks: Vec<Box<dyn Task<C>>>,
}

impl<C: ?Sized> TaskRegistry<C> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a task; tasks run in the order they were registered.
    pub fn register<T>(&mut self, task: T) -> &mut Self
    where
        T: Task<C> + 'static,
    {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn register_boxed(&mut self, task: Box<dyn Task<C>>) -> &mut Self {
        self.tasks.push(task);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Task<C> + 'static)> {
        self.tasks.iter().map(|task| task.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<C: ?Sized> Default for TaskRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for TaskRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Task<str> for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn execute(&self, _path: &Path, context: &str) -> anyhow::Result<TaskResult> {
            Ok(TaskResult::success(self.0, context))
        }
    }

    #[test]
    fn test_status_ordering() {
        assert!(TaskStatus::Success < TaskStatus::Warning);
        assert!(TaskStatus::Warning < TaskStatus::Error);
        assert_eq!(
            [TaskStatus::Warning, TaskStatus::Success].into_iter().max(),
            Some(TaskStatus::Warning)
        );
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry: TaskRegistry<str> = TaskRegistry::new();
        registry.register(Named("b")).register(Named("a"));
        registry.register_boxed(Box::new(Named("c")));
        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_passes_context() {
        let mut registry: TaskRegistry<str> = TaskRegistry::new();
        registry.register(Named("echo"));
        let results: Vec<_> = registry
            .iter()
            .map(|task| task.execute(Path::new("."), "ctx").unwrap())
            .collect();
        assert_eq!(results[0].message(), "ctx");
    }

    #[test]
    fn test_result_constructors() {
        let result = TaskResult::warning("lint", "2 issues");
        assert_eq!(result.name(), "lint");
        assert_eq!(result.status(), TaskStatus::Warning);
        assert_eq!(result.message(), "2 issues");
        assert_eq!(TaskResult::error("x", "").status(), TaskStatus::Error);
    }

    #[test]
    fn test_empty_registry_debug() {
        let registry: TaskRegistry<()> = TaskRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(format!("{:?}", registry), "TaskRegistry { tasks: [] }");
    }
}
