//! Destination path resolution for bulk-repo
//!
//! Every spec's local destination is `root/<team dir>/<repo name>`. The
//! mapping is pure: no filesystem access, no canonicalization, so the same
//! inputs give the same path across calls, processes and runs.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::team::StudentTeam;

/// Resolve the local destination for `repo_name` owned by `team` under `root`.
///
/// Team names and repo names are validated when a `StudentTeam` or
/// `OperationSpec` is built, so both are single, non-empty path components
/// here and distinct pairs never share a destination.
pub fn resolve(root: &Path, team: &StudentTeam, repo_name: &str) -> PathBuf {
    root.join(team.dir_name()).join(repo_name)
}

/// Check that `name` is usable as a single path component.
pub fn validate_repo_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_spec("repository name is empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_spec(format!(
            "repository name '{}' is reserved",
            name
        )));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
    {
        return Err(Error::invalid_spec(format!(
            "repository name '{}' contains a path separator or whitespace",
            name
        )));
    }
    Ok(())
}
