//! # Repository Operations Seam
//!
//! This module defines `GitOperations`, the trait through which the engine
//! performs every version-control action, and `DefaultGitOperations`, the
//! implementation that shells out to the system `git` executable via
//! [`crate::git`].
//!
//! The engine only ever talks to a `Box<dyn GitOperations>`. Tests swap in
//! mock implementations to simulate slow remotes, failing clones or counting
//! invocations without touching the network.

use std::path::Path;

use crate::error::Result;
use crate::git::{self, PushResult};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clone `url` into `target_dir`, optionally at `branch`.
    ///
    /// `target_dir` does not exist when this is called. Implementations must
    /// not leave a partial repository behind on failure.
    fn clone_repo(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()>;

    /// Push `refspec` from the working tree at `repo_dir` to `url`.
    fn push(&self, repo_dir: &Path, url: &str, refspec: &str) -> Result<PushResult>;

    /// Fast-forward the checked out branch of `repo_dir` from its upstream.
    fn pull(&self, repo_dir: &Path) -> Result<()>;

    /// URL of the `origin` remote of the repository at `repo_dir`.
    fn remote_url(&self, repo_dir: &Path) -> Result<String>;

    /// Currently checked out branch of the repository at `repo_dir`.
    fn current_branch(&self, repo_dir: &Path) -> Result<String>;

    /// Whether `path` is the top level of a git working tree.
    fn is_repository(&self, path: &Path) -> bool;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Clone)]
pub struct DefaultGitOperations {
    program: String,
    clone_depth: Option<u32>,
}

impl DefaultGitOperations {
    pub fn new(program: impl Into<String>, clone_depth: Option<u32>) -> Self {
        Self {
            program: program.into(),
            clone_depth,
        }
    }
}

impl Default for DefaultGitOperations {
    fn default() -> Self {
        Self::new("git", None)
    }
}

impl GitOperations for DefaultGitOperations {
    fn clone_repo(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
        git::clone(&self.program, url, branch, self.clone_depth, target_dir)
    }

    fn push(&self, repo_dir: &Path, url: &str, refspec: &str) -> Result<PushResult> {
        git::push(&self.program, repo_dir, url, refspec)
    }

    fn pull(&self, repo_dir: &Path) -> Result<()> {
        git::pull(&self.program, repo_dir)
    }

    fn remote_url(&self, repo_dir: &Path) -> Result<String> {
        git::remote_url(&self.program, repo_dir)
    }

    fn current_branch(&self, repo_dir: &Path) -> Result<String> {
        git::current_branch(&self.program, repo_dir)
    }

    fn is_repository(&self, path: &Path) -> bool {
        git::is_work_tree(&self.program, path)
    }
}
