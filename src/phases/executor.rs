//! Operation Executor
//!
//! Performs the clone or push a single spec describes and turns whatever
//! happens into an `OperationStatus`. Nothing escapes this boundary: git
//! errors and panics inside a `GitOperations` implementation both become
//! `Failed` statuses carrying a diagnostic.
//!
//! ## Clone
//!
//! - Destination missing: clone it. `Completed`.
//! - Destination is a working tree whose `origin` matches the spec URL (and
//!   whose branch matches, when the spec names one): `AlreadyUpToDate`,
//!   without touching the network.
//! - Anything else at the destination: `Failed`.
//!
//! ## Push
//!
//! Pushes `HEAD` of the spec's source working tree to the spec URL, onto
//! `refs/heads/<branch>` when a branch is set. The pushed remote is then
//! mirrored at the spec's destination: cloned when missing, fast-forwarded
//! when it is already a matching working tree. Tasks therefore always run
//! against the destination, never against the shared source.
//!
//! The push is `AlreadyUpToDate` only when git reported "Everything
//! up-to-date" and the destination already existed. Otherwise it is
//! `Completed`.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, info, warn};

use super::panic_message;
use crate::error::{Error, Result};
use crate::git::PushResult;
use crate::report::OperationStatus;
use crate::repository::GitOperations;
use crate::spec::{OperationKind, OperationSpec};

/// What a successful clone or push did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Synced {
    Changed,
    Unchanged,
}

/// Run one spec to a terminal status.
pub fn execute(git: &dyn GitOperations, spec: &OperationSpec) -> OperationStatus {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| match spec.kind() {
        OperationKind::Clone => clone_spec(git, spec),
        OperationKind::Push => push_spec(git, spec),
    }));

    let status = match attempt {
        Ok(Ok(Synced::Changed)) => OperationStatus::completed(spec.clone()),
        Ok(Ok(Synced::Unchanged)) => OperationStatus::up_to_date(spec.clone()),
        Ok(Err(e)) => OperationStatus::failed(spec.clone(), e.to_string()),
        Err(payload) => OperationStatus::failed(
            spec.clone(),
            format!("{} panicked: {}", spec.kind(), panic_message(payload.as_ref())),
        ),
    };

    match status.error() {
        None => info!("{} {}: {}", spec.kind(), spec.repo_name(), status.outcome()),
        Some(error) => warn!("{} {} failed: {}", spec.kind(), spec.repo_name(), error),
    }

    status
}

fn clone_spec(git: &dyn GitOperations, spec: &OperationSpec) -> Result<Synced> {
    let dest = spec.path();

    if dest.exists() {
        check_existing(git, dest, spec.url(), spec.branch())?;
        return Ok(Synced::Unchanged);
    }

    git.clone_repo(spec.url(), spec.branch(), dest)?;
    Ok(Synced::Changed)
}

fn push_spec(git: &dyn GitOperations, spec: &OperationSpec) -> Result<Synced> {
    let source = spec
        .source()
        .ok_or_else(|| Error::invalid_spec(format!("push of {} has no source", spec.repo_name())))?;

    if !git.is_repository(source) {
        return Err(Error::NotARepository {
            path: source.to_path_buf(),
        });
    }

    // A detached source has no branch name to mirror.
    let branch = match spec.branch() {
        Some(branch) => Some(branch.to_string()),
        None => Some(git.current_branch(source)?).filter(|b| b != "HEAD"),
    };

    let refspec = match spec.branch() {
        Some(branch) => format!("HEAD:refs/heads/{}", branch),
        None => "HEAD".to_string(),
    };

    let pushed = git.push(source, spec.url(), &refspec)?;

    let dest = spec.path();
    let created = if dest.exists() {
        check_existing(git, dest, spec.url(), branch.as_deref())?;
        debug!("Updating {} from {}", dest.display(), spec.url());
        git.pull(dest)?;
        false
    } else {
        git.clone_repo(spec.url(), branch.as_deref(), dest)?;
        true
    };

    Ok(match (pushed, created) {
        (PushResult::UpToDate, false) => Synced::Unchanged,
        _ => Synced::Changed,
    })
}

/// Check that `dest` is a working tree of `url`, on `branch` when given.
fn check_existing(
    git: &dyn GitOperations,
    dest: &Path,
    url: &str,
    branch: Option<&str>,
) -> Result<()> {
    if !git.is_repository(dest) {
        return Err(Error::NotARepository {
            path: dest.to_path_buf(),
        });
    }

    let origin = git.remote_url(dest)?;
    if !same_remote(&origin, url) {
        return Err(Error::StateMismatch {
            path: dest.to_path_buf(),
            message: format!("origin is {}, expected {}", origin, url),
        });
    }

    if let Some(expected) = branch {
        let current = git.current_branch(dest)?;
        if current != expected {
            return Err(Error::StateMismatch {
                path: dest.to_path_buf(),
                message: format!("checked out branch is {}, expected {}", current, expected),
            });
        }
    }

    Ok(())
}

/// Compare remote URLs ignoring a trailing slash or `.git` suffix.
fn same_remote(a: &str, b: &str) -> bool {
    fn normalize(url: &str) -> &str {
        let url = url.trim().trim_end_matches('/');
        url.strip_suffix(".git").unwrap_or(url)
    }
    normalize(a) == normalize(b)
}
