//! Wrappers around the system `git` executable.
//!
//! Every function takes the program name so the engine can be pointed at a
//! specific git binary through `EngineConfig`. Commands run with
//! `GIT_TERMINAL_PROMPT=0`: a worker must never block on a credential prompt.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use log::{debug, warn};

use crate::error::{Error, Result};

/// What a successful push did on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResult {
    /// The remote ref moved.
    Updated,
    /// git reported "Everything up-to-date".
    UpToDate,
}

/// Clone a repository into `target_dir`
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
///
/// `target_dir` must not exist. If the clone fails, whatever git left at
/// `target_dir` is removed.
pub fn clone(
    program: &str,
    url: &str,
    branch: Option<&str>,
    depth: Option<u32>,
    target_dir: &Path,
) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut args = vec!["clone".to_string(), "--quiet".to_string()];
    if let Some(depth) = depth {
        args.push(format!("--depth={}", depth));
    }
    if let Some(branch) = branch {
        args.push("--branch".to_string());
        args.push(branch.to_string());
    }
    args.push(url.to_string());

    debug!("git clone {} -> {}", url, target_dir.display());
    let output = git_command(program, None)
        .args(&args)
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            message: e.to_string(),
            hint: Some(format!("Is '{}' installed and on PATH?", program)),
        })?;

    if !output.status.success() {
        let leftover = remove_partial_clone(target_dir);

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = if is_auth_failure(&stderr) {
            Some(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up"
                    .to_string(),
            )
        } else {
            None
        };

        let mut message = summarize(&stderr, output.status.code());
        if let Some(leftover) = leftover {
            message.push_str("; ");
            message.push_str(&leftover);
        }

        return Err(Error::GitClone {
            url: url.to_string(),
            message,
            hint,
        });
    }

    Ok(())
}

/// Remove what a failed clone left at `target_dir`.
///
/// Returns a note for the clone error when something could not be removed.
fn remove_partial_clone(target_dir: &Path) -> Option<String> {
    if !target_dir.exists() {
        return None;
    }
    match fs::remove_dir_all(target_dir) {
        Ok(()) => None,
        Err(e) => {
            warn!(
                "Could not remove partial clone at {}: {}",
                target_dir.display(),
                e
            );
            Some(format!(
                "partial clone left at {} ({})",
                target_dir.display(),
                e
            ))
        }
    }
}

/// Fast-forward the checked out branch of `repo_dir` from its upstream.
pub fn pull(program: &str, repo_dir: &Path) -> Result<()> {
    let target = repo_dir.display().to_string();
    debug!("git pull --ff-only ({})", target);
    run(
        program,
        Some(repo_dir),
        &["pull", "--ff-only", "--quiet"],
        &target,
    )?;
    Ok(())
}

/// Push `refspec` from the working tree at `repo_dir` to `url`.
pub fn push(program: &str, repo_dir: &Path, url: &str, refspec: &str) -> Result<PushResult> {
    debug!("git push {} {} (from {})", url, refspec, repo_dir.display());
    let output = run(program, Some(repo_dir), &["push", "--porcelain", url, refspec], url)?;

    // --porcelain marks an unchanged ref with '=' on stdout; older gits only
    // print the human message on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let up_to_date = stderr.contains("Everything up-to-date")
        || stdout.contains("[up to date]")
        || stdout.lines().any(|line| line.starts_with("=\t"));

    Ok(if up_to_date {
        PushResult::UpToDate
    } else {
        PushResult::Updated
    })
}

/// Return the URL of the `origin` remote of the repository at `repo_dir`.
pub fn remote_url(program: &str, repo_dir: &Path) -> Result<String> {
    let target = repo_dir.display().to_string();
    let output = run(
        program,
        Some(repo_dir),
        &["remote", "get-url", "origin"],
        &target,
    )?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Return the checked out branch of the repository at `repo_dir`.
pub fn current_branch(program: &str, repo_dir: &Path) -> Result<String> {
    let target = repo_dir.display().to_string();
    let output = run(
        program,
        Some(repo_dir),
        &["rev-parse", "--abbrev-ref", "HEAD"],
        &target,
    )?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Whether `path` is the top level of a git working tree.
///
/// A directory nested inside some other repository does not count.
pub fn is_work_tree(program: &str, path: &Path) -> bool {
    if !path.join(".git").exists() {
        return false;
    }
    git_command(program, Some(path))
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn git_command(program: &str, cwd: Option<&Path>) -> Command {
    let mut cmd = Command::new(program);
    if let Some(dir) = cwd {
        cmd.arg("-C").arg(dir);
    }
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

fn run(program: &str, cwd: Option<&Path>, args: &[&str], target: &str) -> Result<Output> {
    let command = args.join(" ");
    let output = git_command(program, cwd)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            target: target.to_string(),
            code: None,
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            target: target.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
        || stderr.contains("could not read Username")
}

/// Last non-empty stderr line plus exit code, e.g. `fatal: ... (exit 128)`.
fn summarize(stderr: &str, code: Option<i32>) -> String {
    let line = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("no output");
    match code {
        Some(code) => format!("{} (exit {})", line.trim(), code),
        None => format!("{} (terminated by signal)", line.trim()),
    }
}
