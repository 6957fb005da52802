//! Shared test utilities for integration and E2E tests.
//!
//! Tests that need real repositories build them locally with the `git`
//! executable: a "platform" is just a directory of bare repositories, so
//! nothing here touches the network.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = TestFixture::new();
//!     fixture.remote("alice-task-1", &[("README.md", "hi")]);
//!     fixture.write_plan(&["alice"], &["task-1"], "");
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::{git, git_available, TestFixture};
}

/// Whether a usable `git` is on `PATH`. Tests that need one return early
/// when it is missing.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` and panic with its stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A temporary directory holding a fake platform (`remotes/`), a local
/// working area (`repos/`) and a plan file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Base URL of the fake platform.
    pub fn remotes(&self) -> PathBuf {
        self.path().join("remotes")
    }

    /// Where clones land.
    pub fn root(&self) -> PathBuf {
        self.path().join("repos")
    }

    pub fn plan_path(&self) -> PathBuf {
        self.path().join("bulk-repo.yaml")
    }

    /// Create a non-bare repository at `templates/{name}` with one commit
    /// on `main` containing `files`.
    pub fn template(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let work = self.path().join("templates").join(name);
        std::fs::create_dir_all(&work).expect("Failed to create template dir");
        git(&work, &["init", "-q"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        for (file, content) in files {
            let path = work.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).expect("Failed to write template file");
        }
        git(&work, &["add", "-A"]);
        git(&work, &["commit", "-q", "--allow-empty", "-m", "initial"]);
        work
    }

    /// Create a bare repository `remotes/{name}` seeded with `files`.
    pub fn remote(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let work = self.template(&format!("seed-{}", name), files);
        let bare = self.remotes().join(name);
        std::fs::create_dir_all(self.remotes()).expect("Failed to create remotes dir");
        git(
            self.path(),
            &[
                "clone",
                "-q",
                "--bare",
                work.to_str().unwrap(),
                bare.to_str().unwrap(),
            ],
        );
        bare
    }

    /// Create an empty bare repository `remotes/{name}`.
    pub fn empty_remote(&self, name: &str) -> PathBuf {
        let bare = self.remotes().join(name);
        std::fs::create_dir_all(&bare).expect("Failed to create remote dir");
        git(&bare, &["init", "-q", "--bare"]);
        bare
    }

    /// Write a plan pointing at this fixture's remotes and root.
    /// `extra` is appended verbatim (e.g. a `tasks:` section).
    pub fn write_plan(&self, teams: &[&str], templates: &[&str], extra: &str) -> PathBuf {
        self.write_plan_with_base(&self.remotes().display().to_string(), teams, templates, extra)
    }

    pub fn write_plan_with_base(
        &self,
        base_url: &str,
        teams: &[&str],
        templates: &[&str],
        extra: &str,
    ) -> PathBuf {
        let quote = |items: &[&str]| {
            items
                .iter()
                .map(|i| format!("'{}'", i))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let plan = format!(
            "base_url: '{}'\nroot: '{}'\nteams: [{}]\ntemplates: [{}]\n{}",
            base_url,
            self.root().display(),
            quote(teams),
            quote(templates),
            extra
        );
        self.temp_dir
            .child("bulk-repo.yaml")
            .write_str(&plan)
            .expect("Failed to write plan");
        self.plan_path()
    }

    /// A `bulk-repo` command running in the fixture directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bulk-repo");
        cmd.current_dir(self.path())
            .env_remove("BULK_REPO_PLAN")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
