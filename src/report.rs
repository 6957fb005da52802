//! Report types
//!
//! Values produced by one engine run: the per-spec `OperationStatus`, the
//! per-repository `RepoReport`, the ordered `BatchReport`, and the
//! `BatchOutcome` that is either a finished report or a fatal precheck.
//! All of them serialize to JSON for machine-readable output.

use std::fmt;

use serde::Serialize;

use crate::spec::OperationSpec;
use crate::task::{TaskResult, TaskStatus};

/// Terminal outcome of one clone or push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationOutcome {
    Completed,
    AlreadyUpToDate,
    Failed,
}

impl OperationOutcome {
    /// Whether tasks may run against the repository.
    pub fn is_success(self) -> bool {
        !matches!(self, OperationOutcome::Failed)
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationOutcome::Completed => f.write_str("completed"),
            OperationOutcome::AlreadyUpToDate => f.write_str("already up to date"),
            OperationOutcome::Failed => f.write_str("failed"),
        }
    }
}

/// The executor's verdict on one spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationStatus {
    spec: OperationSpec,
    outcome: OperationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl OperationStatus {
    pub fn completed(spec: OperationSpec) -> Self {
        Self {
            spec,
            outcome: OperationOutcome::Completed,
            error: None,
        }
    }

    pub fn up_to_date(spec: OperationSpec) -> Self {
        Self {
            spec,
            outcome: OperationOutcome::AlreadyUpToDate,
            error: None,
        }
    }

    pub fn failed(spec: OperationSpec, error: impl Into<String>) -> Self {
        Self {
            spec,
            outcome: OperationOutcome::Failed,
            error: Some(error.into()),
        }
    }

    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub fn outcome(&self) -> OperationOutcome {
        self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Verdict for a repository or a whole batch. Ordered worst-last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Success,
    Warning,
    Error,
    /// The precheck failed and nothing ran.
    Fatal,
}

impl Verdict {
    /// Conventional process exit status for this verdict.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Success => 0,
            Verdict::Warning | Verdict::Error | Verdict::Fatal => 1,
        }
    }
}

impl From<TaskStatus> for Verdict {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Success => Verdict::Success,
            TaskStatus::Warning => Verdict::Warning,
            TaskStatus::Error => Verdict::Error,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => f.write_str("success"),
            Verdict::Warning => f.write_str("warning"),
            Verdict::Error => f.write_str("error"),
            Verdict::Fatal => f.write_str("fatal"),
        }
    }
}

/// Operation status and task results for one spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    status: OperationStatus,
    results: Vec<TaskResult>,
}

impl RepoReport {
    pub fn new(status: OperationStatus, results: Vec<TaskResult>) -> Self {
        Self { status, results }
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    /// `Error` if the operation failed, otherwise the worst task status
    /// (`Success` when no tasks ran).
    pub fn verdict(&self) -> Verdict {
        if !self.status.outcome().is_success() {
            return Verdict::Error;
        }
        self.results
            .iter()
            .map(|result| Verdict::from(result.status()))
            .max()
            .unwrap_or(Verdict::Success)
    }
}

/// Per-spec reports in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    repos: Vec<RepoReport>,
}

impl BatchReport {
    pub fn new(repos: Vec<RepoReport>) -> Self {
        Self { repos }
    }

    pub fn repos(&self) -> &[RepoReport] {
        &self.repos
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Worst verdict across all repositories; `Success` for an empty batch.
    pub fn verdict(&self) -> Verdict {
        self.repos
            .iter()
            .map(RepoReport::verdict)
            .max()
            .unwrap_or(Verdict::Success)
    }

    /// Number of repositories per operation outcome, in
    /// (completed, up to date, failed) order.
    pub fn outcome_counts(&self) -> (usize, usize, usize) {
        self.repos
            .iter()
            .fold((0, 0, 0), |(c, u, f), repo| match repo.status().outcome() {
                OperationOutcome::Completed => (c + 1, u, f),
                OperationOutcome::AlreadyUpToDate => (c, u + 1, f),
                OperationOutcome::Failed => (c, u, f + 1),
            })
    }
}

/// What the engine hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The precheck failed; no operation or task ran.
    Fatal { reason: String },
    /// Every spec reached a terminal state.
    Finished { report: BatchReport },
}

impl BatchOutcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            BatchOutcome::Fatal { .. } => Verdict::Fatal,
            BatchOutcome::Finished { report } => report.verdict(),
        }
    }

    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Fatal { .. } => None,
            BatchOutcome::Finished { report } => Some(report),
        }
    }
}
