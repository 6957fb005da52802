//! Built-in tasks
//!
//! Two tasks ship with the engine so a plan file can do useful work without
//! custom code:
//!
//! - `RequiredFilesTask` warns when a repository lacks files matching any of
//!   a list of glob patterns.
//! - `CommandTask` runs a program inside the repository and reports its exit
//!   status.
//!
//! Both ignore the platform context, so they can be registered in a
//! `TaskRegistry<C>` for any `C`.

use std::path::Path;
use std::process::Command;

use anyhow::Context;
use glob::Pattern;

use crate::config::{CommandConfig, RequiredFilesConfig, TaskConfig};
use crate::error::Result;
use crate::task::{Task, TaskRegistry, TaskResult};

/// Number of stderr lines kept in a failing command's message.
const STDERR_TAIL_LINES: usize = 5;

/// Checks that each pattern matches at least one file in the repository.
#[derive(Debug, Clone)]
pub struct RequiredFilesTask {
    patterns: Vec<String>,
}

impl RequiredFilesTask {
    /// Fails with `Error::Glob` if a pattern does not compile.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        for pattern in &patterns {
            Pattern::new(pattern)?;
        }
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    fn matches_any(&self, root: &Path, pattern: &str) -> anyhow::Result<bool> {
        let full = format!(
            "{}/{}",
            Pattern::escape(&root.to_string_lossy()),
            pattern.trim_start_matches('/')
        );
        let mut paths = glob::glob(&full).with_context(|| format!("bad pattern '{}'", pattern))?;
        Ok(paths.any(|entry| entry.is_ok()))
    }
}

impl<C: ?Sized> Task<C> for RequiredFilesTask {
    fn name(&self) -> &str {
        "required-files"
    }

    fn execute(&self, path: &Path, _context: &C) -> anyhow::Result<TaskResult> {
        let mut missing = Vec::new();
        for pattern in &self.patterns {
            if !self.matches_any(path, pattern)? {
                missing.push(pattern.as_str());
            }
        }

        let name = <Self as Task<C>>::name(self);
        if missing.is_empty() {
            Ok(TaskResult::success(
                name,
                format!("all {} pattern(s) matched", self.patterns.len()),
            ))
        } else {
            Ok(TaskResult::warning(
                name,
                format!("missing: {}", missing.join(", ")),
            ))
        }
    }
}

/// Runs a program with the repository as its working directory.
///
/// Exit status 0 is a success whose message is the last line of stdout. Any
/// other exit status is an error carrying the code and the tail of stderr.
/// A program that cannot be started is reported as a task failure.
#[derive(Debug, Clone)]
pub struct CommandTask {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandTask {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<C: ?Sized> Task<C> for CommandTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, path: &Path, _context: &C) -> anyhow::Result<TaskResult> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(path)
            .output()
            .with_context(|| format!("could not run '{}'", self.command_line()))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let last = stdout
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("exited with status 0");
            return Ok(TaskResult::success(&self.name, last.trim()));
        }

        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");

        let message = if tail.is_empty() {
            format!("'{}' exited with {}", self.command_line(), code)
        } else {
            format!("'{}' exited with {}: {}", self.command_line(), code, tail)
        };
        Ok(TaskResult::error(&self.name, message))
    }
}

/// Build a registry from the tasks declared in a plan, in declaration order.
pub fn registry_from_config<C: ?Sized>(tasks: &[TaskConfig]) -> Result<TaskRegistry<C>> {
    let mut registry = TaskRegistry::new();
    for task in tasks {
        match task {
            TaskConfig::RequiredFiles {
                required_files: RequiredFilesConfig { patterns },
            } => {
                registry.register(RequiredFilesTask::new(patterns.iter().cloned())?);
            }
            TaskConfig::Command {
                command:
                    CommandConfig {
                        name,
                        program,
                        args,
                    },
            } => {
                registry.register(CommandTask::new(name, program, args.clone()));
            }
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::task::TaskStatus;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        dir
    }

    fn run<T: Task<()>>(task: &T, path: &Path) -> TaskResult {
        task.execute(path, &()).unwrap()
    }

    #[test]
    fn test_required_files_all_present() {
        let repo = repo_with(&["README.md", "src/main.py"]);
        let task = RequiredFilesTask::new(["README.md", "src/*.py"]).unwrap();

        let result = run(&task, repo.path());

        assert_eq!(result.status(), TaskStatus::Success);
        assert_eq!(result.name(), "required-files");
    }

    #[test]
    fn test_required_files_reports_missing() {
        let repo = repo_with(&["README.md"]);
        let task = RequiredFilesTask::new(["README.md", "src/*.py", "LICENSE"]).unwrap();

        let result = run(&task, repo.path());

        assert_eq!(result.status(), TaskStatus::Warning);
        assert!(result.message().contains("src/*.py"));
        assert!(result.message().contains("LICENSE"));
        assert!(!result.message().contains("README.md"));
    }

    #[test]
    fn test_required_files_rejects_bad_pattern() {
        let err = RequiredFilesTask::new(["[unclosed"]).unwrap_err();
        assert!(matches!(err, Error::Glob(_)));
    }

    #[test]
    fn test_required_files_root_with_metacharacters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("team[1]");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("README.md"), "x").unwrap();

        let task = RequiredFilesTask::new(["README.md"]).unwrap();
        assert_eq!(run(&task, &root).status(), TaskStatus::Success);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_success_uses_last_stdout_line() {
        let repo = repo_with(&[]);
        let task = CommandTask::new(
            "echo",
            "sh",
            vec!["-c".into(), "echo first; echo 'all good'".into()],
        );

        let result = run(&task, repo.path());

        assert_eq!(result.status(), TaskStatus::Success);
        assert_eq!(result.message(), "all good");
        assert_eq!(result.name(), "echo");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_runs_in_repository() {
        let repo = repo_with(&["marker.txt"]);
        let task = CommandTask::new("ls", "sh", vec!["-c".into(), "ls".into()]);

        let result = run(&task, repo.path());

        assert_eq!(result.message(), "marker.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failure_reports_code_and_stderr() {
        let repo = repo_with(&[]);
        let task = CommandTask::new(
            "fails",
            "sh",
            vec!["-c".into(), "echo boom >&2; exit 3".into()],
        );

        let result = run(&task, repo.path());

        assert_eq!(result.status(), TaskStatus::Error);
        assert!(result.message().contains("exited with 3"));
        assert!(result.message().contains("boom"));
    }

    #[test]
    fn test_command_missing_program_is_err() {
        let repo = repo_with(&[]);
        let task = CommandTask::new("nope", "definitely-not-a-real-program-xyz", Vec::new());
        let err = Task::<()>::execute(&task, repo.path(), &()).unwrap_err();
        assert!(format!("{:#}", err).contains("could not run"));
    }

    #[test]
    fn test_registry_from_config_keeps_order() {
        let plan = crate::config::parse(
            r#"
base_url: x
teams: [a]
templates: [t]
tasks:
  - command:
      name: build
      program: make
  - required-files:
      patterns: ["README.md"]
"#,
        )
        .unwrap();

        let registry: TaskRegistry<()> = registry_from_config(&plan.tasks).unwrap();
        assert_eq!(registry.names(), vec!["build", "required-files"]);
    }

    #[test]
    fn test_registry_from_config_bad_pattern() {
        let tasks = vec![TaskConfig::RequiredFiles {
            required_files: RequiredFilesConfig {
                patterns: vec!["[".to_string()],
            },
        }];
        assert!(registry_from_config::<()>(&tasks).is_err());
    }
}
