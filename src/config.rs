//! # Configuration
//!
//! Two layers of configuration live here:
//!
//! - **`EngineConfig`**: the immutable settings the engine itself needs
//!   (worker count, git program, clone depth, precheck timeout). It is built
//!   once at start-up and handed to `Engine::new`; the engine never reads the
//!   process environment on its own.
//!
//! - **`Plan`**: the YAML file the command-line tool reads. It names the
//!   platform base URL, the teams, the templates and the post-operation
//!   tasks, plus optional overrides for the engine settings.
//!
//! ## Plan format
//!
//! ```yaml
//! base_url: https://github.com/my-course
//! root: ./repos
//! branch: main
//! workers: 8
//! teams:
//!   - [alice, bob]
//!   - carol dave
//! templates: [task-1, task-2]
//! tasks:
//!   - required-files:
//!       patterns: ["README.md", "src/*.py"]
//!   - command:
//!       name: tests
//!       program: make
//!       args: [test]
//! ```
//!
//! `root` is taken relative to the working directory of the process.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::team::StudentTeam;

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 8;

/// Default time allowed for the connectivity precheck.
pub const DEFAULT_PRECHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on concurrently running operations (minimum 1).
    pub workers: usize,
    /// Git executable to invoke.
    pub git_program: String,
    /// `--depth` for clones; full history when `None`.
    pub clone_depth: Option<u32>,
    /// Connect timeout for the precheck probe.
    pub precheck_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            git_program: "git".to_string(),
            clone_depth: None,
            precheck_timeout: DEFAULT_PRECHECK_TIMEOUT,
        }
    }
}

/// A team as written in the plan: a member list or a whitespace-separated
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamEntry {
    Members(Vec<String>),
    Line(String),
}

/// Configuration for the `required-files` built-in task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequiredFilesConfig {
    /// Glob patterns, relative to the repository root.
    pub patterns: Vec<String>,
}

/// Configuration for the `command` built-in task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Name shown in the report.
    pub name: String,
    /// Program to run inside the repository.
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A built-in task declared in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskConfig {
    /// Check that files matching each pattern exist.
    RequiredFiles {
        #[serde(rename = "required-files")]
        required_files: RequiredFilesConfig,
    },
    /// Run a program in the repository and report its exit status.
    Command { command: CommandConfig },
}

/// The plan file read by the command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// URL of the organisation or directory that holds the student repos.
    pub base_url: String,
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default)]
    pub clone_depth: Option<u32>,
    #[serde(default)]
    pub precheck_timeout_secs: Option<u64>,
    pub teams: Vec<TeamEntry>,
    pub templates: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Plan {
    /// Engine settings from the plan, falling back to defaults.
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            workers: self.workers.unwrap_or(defaults.workers).max(1),
            git_program: self.git.clone().unwrap_or(defaults.git_program),
            clone_depth: self.clone_depth,
            precheck_timeout: self
                .precheck_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.precheck_timeout),
        }
    }

    /// Build and validate the teams, keeping plan order and dropping
    /// duplicates.
    pub fn teams(&self) -> Result<Vec<StudentTeam>> {
        let mut teams: Vec<StudentTeam> = Vec::with_capacity(self.teams.len());
        for entry in &self.teams {
            let team = match entry {
                TeamEntry::Members(members) => StudentTeam::new(members)?,
                TeamEntry::Line(line) => StudentTeam::from_line(line)?,
            };
            if !teams.contains(&team) {
                teams.push(team);
            }
        }
        Ok(teams)
    }
}

/// Parse a plan from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Plan> {
    let plan: Plan = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some(
            "A plan needs at least 'base_url', 'teams' and 'templates'".to_string(),
        ),
    })?;
    validate(&plan)?;
    Ok(plan)
}

/// Read and parse a plan file.
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Plan> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

fn validate(plan: &Plan) -> Result<()> {
    if plan.base_url.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "'base_url' is empty".to_string(),
            hint: Some("Set it to the organisation URL, e.g. https://github.com/my-course".to_string()),
        });
    }
    if plan.teams.is_empty() {
        return Err(Error::ConfigParse {
            message: "'teams' is empty".to_string(),
            hint: None,
        });
    }
    if plan.templates.is_empty() {
        return Err(Error::ConfigParse {
            message: "'templates' is empty".to_string(),
            hint: None,
        });
    }
    if plan.workers == Some(0) {
        return Err(Error::ConfigParse {
            message: "'workers' must be at least 1".to_string(),
            hint: None,
        });
    }
    for task in &plan.tasks {
        if let TaskConfig::Command { command } = task {
            if command.name.trim().is_empty() || command.program.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: "command tasks need a non-empty 'name' and 'program'".to_string(),
                    hint: None,
                });
            }
        }
    }
    Ok(())
}
