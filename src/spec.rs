//! Operation specs and batches
//!
//! An `OperationSpec` is an immutable description of one repository
//! operation: clone a remote into its resolved destination, or push a local
//! working tree to a remote and mirror it at the destination. Tasks always
//! run in the destination. A `Batch` is the ordered list of specs handed to
//! the engine; its order is the order of the final report.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::path;
use crate::team::{repo_name_for, StudentTeam};

/// The kind of repository operation a spec describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Clone,
    Push,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Clone => f.write_str("clone"),
            OperationKind::Push => f.write_str("push"),
        }
    }
}

/// One desired repository operation.
///
/// Fields are private; a spec can only be built through the validating
/// constructors and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    kind: OperationKind,
    team: StudentTeam,
    repo_name: String,
    url: String,
    branch: Option<String>,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
}

impl OperationSpec {
    /// Clone `url` into `resolve(root, team, repo_name)`.
    pub fn for_clone(
        root: &Path,
        team: StudentTeam,
        repo_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self> {
        Self::build(OperationKind::Clone, root, team, repo_name.into(), url.into(), None)
    }

    /// Push the working tree at `source` to `url`.
    ///
    /// The spec still owns `resolve(root, team, repo_name)` as its identity so
    /// that a batch can check destinations for collisions.
    pub fn for_push(
        root: &Path,
        team: StudentTeam,
        repo_name: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<PathBuf>,
    ) -> Result<Self> {
        let source = source.into();
        if source.as_os_str().is_empty() {
            return Err(Error::invalid_spec("push source path is empty"));
        }
        Self::build(
            OperationKind::Push,
            root,
            team,
            repo_name.into(),
            url.into(),
            Some(source),
        )
    }

    fn build(
        kind: OperationKind,
        root: &Path,
        team: StudentTeam,
        repo_name: String,
        url: String,
        source: Option<PathBuf>,
    ) -> Result<Self> {
        path::validate_repo_name(&repo_name)?;
        if url.trim().is_empty() {
            return Err(Error::invalid_spec(format!(
                "remote url for '{}' is empty",
                repo_name
            )));
        }

        let path = path::resolve(root, &team, &repo_name);
        Ok(Self {
            kind,
            team,
            repo_name,
            url: url.trim().to_string(),
            branch: None,
            path,
            source,
        })
    }

    /// Return a copy of this spec pinned to `branch`.
    pub fn with_branch(self, branch: impl Into<String>) -> Result<Self> {
        let branch = branch.into();
        if branch.trim().is_empty() || branch.chars().any(char::is_whitespace) {
            return Err(Error::invalid_spec(format!(
                "branch name '{}' is invalid",
                branch
            )));
        }
        Ok(Self {
            branch: Some(branch),
            ..self
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn team(&self) -> &StudentTeam {
        &self.team
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// The resolved destination under the batch root, where tasks run.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Local working tree of a push spec.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Display for OperationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.repo_name)
    }
}

/// Join a base URL and a repository name.
pub fn repo_url(base_url: &str, repo_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), repo_name)
}

/// An ordered, validated collection of specs.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    specs: Vec<OperationSpec>,
}

impl Batch {
    /// Build a batch, rejecting specs that would share a destination.
    pub fn new(specs: Vec<OperationSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.path()) {
                return Err(Error::DuplicateDestination {
                    path: spec.path().to_path_buf(),
                });
            }
        }
        Ok(Self { specs })
    }

    /// Clone every team's copy of every template, team-major order.
    pub fn clone_from_templates(
        root: &Path,
        base_url: &str,
        teams: &[StudentTeam],
        templates: &[String],
        branch: Option<&str>,
    ) -> Result<Self> {
        let mut specs = Vec::with_capacity(teams.len() * templates.len());
        for team in teams {
            for template in templates {
                let repo_name = repo_name_for(team, template);
                let url = repo_url(base_url, &repo_name);
                let spec = OperationSpec::for_clone(root, team.clone(), repo_name, url)?;
                specs.push(with_optional_branch(spec, branch)?);
            }
        }
        Self::new(specs)
    }

    /// Push each local template in `templates_dir` to every team's copy,
    /// team-major order.
    pub fn push_from_templates(
        root: &Path,
        base_url: &str,
        templates_dir: &Path,
        teams: &[StudentTeam],
        templates: &[String],
        branch: Option<&str>,
    ) -> Result<Self> {
        let mut specs = Vec::with_capacity(teams.len() * templates.len());
        for team in teams {
            for template in templates {
                path::validate_repo_name(template)?;
                let repo_name = repo_name_for(team, template);
                let url = repo_url(base_url, &repo_name);
                let source = templates_dir.join(template);
                let spec = OperationSpec::for_push(root, team.clone(), repo_name, url, source)?;
                specs.push(with_optional_branch(spec, branch)?);
            }
        }
        Self::new(specs)
    }

    pub fn specs(&self) -> &[OperationSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationSpec> {
        self.specs.iter()
    }
}

fn with_optional_branch(spec: OperationSpec, branch: Option<&str>) -> Result<OperationSpec> {
    match branch {
        Some(branch) => spec.with_branch(branch),
        None => Ok(spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(members: &[&str]) -> StudentTeam {
        StudentTeam::new(members.iter().copied()).unwrap()
    }

    #[test]
    fn test_clone_spec_resolves_destination() {
        let root = PathBuf::from("/tmp/course");
        let spec = OperationSpec::for_clone(
            &root,
            team(&["alice"]),
            "alice-task-1",
            "https://example.com/org/alice-task-1",
        )
        .unwrap();

        assert_eq!(spec.kind(), OperationKind::Clone);
        assert_eq!(spec.path(), Path::new("/tmp/course/alice/alice-task-1"));
        assert_eq!(spec.branch(), None);
        assert_eq!(spec.source(), None);
    }

    #[test]
    fn test_push_spec_keeps_source_apart_from_destination() {
        let root = PathBuf::from("/tmp/course");
        let spec = OperationSpec::for_push(
            &root,
            team(&["alice"]),
            "alice-task-1",
            "https://example.com/org/alice-task-1",
            "/tmp/templates/task-1",
        )
        .unwrap();

        assert_eq!(spec.kind(), OperationKind::Push);
        assert_eq!(spec.source(), Some(Path::new("/tmp/templates/task-1")));
        assert_eq!(spec.path(), Path::new("/tmp/course/alice/alice-task-1"));
    }

    #[test]
    fn test_invalid_specs_are_rejected() {
        let root = PathBuf::from("root");
        assert!(OperationSpec::for_clone(&root, team(&["a"]), "", "url").is_err());
        assert!(OperationSpec::for_clone(&root, team(&["a"]), "repo", "  ").is_err());
        assert!(OperationSpec::for_push(&root, team(&["a"]), "repo", "url", "").is_err());
    }

    #[test]
    fn test_batch_accepts_hyphenated_member_next_to_pair() {
        let teams = vec![team(&["jean-luc"]), team(&["jean", "luc"])];
        let templates = vec!["task-1".to_string()];

        let batch = Batch::clone_from_templates(
            Path::new("root"),
            "https://example.com/org",
            &teams,
            &templates,
            None,
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_ne!(batch.specs()[0].path(), batch.specs()[1].path());
    }

    #[test]
    fn test_with_branch() {
        let root = PathBuf::from("root");
        let spec = OperationSpec::for_clone(&root, team(&["a"]), "repo", "url").unwrap();
        let spec = spec.with_branch("main").unwrap();
        assert_eq!(spec.branch(), Some("main"));

        let spec = OperationSpec::for_clone(&root, team(&["a"]), "repo", "url").unwrap();
        assert!(spec.with_branch("two words").is_err());
    }

    #[test]
    fn test_repo_url_joins_without_double_slash() {
        assert_eq!(repo_url("https://host/org/", "r"), "https://host/org/r");
        assert_eq!(repo_url("file:///srv/git", "r"), "file:///srv/git/r");
    }

    #[test]
    fn test_batch_preserves_order() {
        let root = PathBuf::from("root");
        let teams = vec![team(&["bob"]), team(&["alice"])];
        let templates = vec!["task-1".to_string(), "task-2".to_string()];
        let batch =
            Batch::clone_from_templates(&root, "https://host/org", &teams, &templates, Some("main"))
                .unwrap();

        let names: Vec<_> = batch.iter().map(|s| s.repo_name().to_string()).collect();
        assert_eq!(
            names,
            vec!["bob-task-1", "bob-task-2", "alice-task-1", "alice-task-2"]
        );
        assert!(batch.iter().all(|s| s.branch() == Some("main")));
        assert_eq!(batch.specs()[0].url(), "https://host/org/bob-task-1");
    }

    #[test]
    fn test_batch_rejects_duplicate_destinations() {
        let root = PathBuf::from("root");
        let a = OperationSpec::for_clone(&root, team(&["alice"]), "repo", "url-1").unwrap();
        let b = OperationSpec::for_clone(&root, team(&["alice"]), "repo", "url-2").unwrap();
        let err = Batch::new(vec![a, b]).unwrap_err();
        assert!(matches!(err, Error::DuplicateDestination { .. }));
    }

    #[test]
    fn test_push_batch_sources() {
        let root = PathBuf::from("root");
        let teams = vec![team(&["alice"])];
        let templates = vec!["task-1".to_string()];
        let batch = Batch::push_from_templates(
            &root,
            "https://host/org",
            Path::new("/templates"),
            &teams,
            &templates,
            None,
        )
        .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.specs()[0].source(), Some(Path::new("/templates/task-1")));
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new(Vec::new()).unwrap();
        assert!(batch.is_empty());
    }
}
