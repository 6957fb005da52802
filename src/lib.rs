//! # Bulk Repository Operations
//!
//! This library clones or pushes many student and team repositories in one
//! batch. It is used by the `bulk-repo` command-line tool, and can be driven
//! directly by any program that can produce a list of operation specs.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use bulk_repo::spec::Batch;
//! use bulk_repo::team::StudentTeam;
//!
//! let teams = vec![
//!     StudentTeam::new(["alice", "bob"]).unwrap(),
//!     StudentTeam::from_line("carol").unwrap(),
//! ];
//! let templates = vec!["task-1".to_string(), "task-2".to_string()];
//!
//! let batch = Batch::clone_from_templates(
//!     Path::new("repos"),
//!     "https://github.com/my-course",
//!     &teams,
//!     &templates,
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(batch.len(), 4);
//! assert_eq!(batch.specs()[0].repo_name(), "alice-bob-task-1");
//! assert_eq!(
//!     batch.specs()[0].path(),
//!     Path::new("repos/alice-bob/alice-bob-task-1")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Teams and specs (`team`, `spec`, `path`)**: a `StudentTeam` owns
//!   repositories; an `OperationSpec` says which repository to clone or push
//!   and where its working tree lives on disk.
//! - **Git access (`git`, `repository`)**: thin wrappers around the `git`
//!   executable behind the `GitOperations` trait, so the engine can be
//!   exercised with a mock.
//! - **Precheck (`precheck`)**: a `Connectivity` probe that runs once before
//!   any work starts.
//! - **Tasks (`task`, `builtin_tasks`)**: post-operation plugins run against
//!   every repository whose operation succeeded.
//! - **Reports (`report`, `output`)**: ordered per-repository results, an
//!   overall verdict, and text or JSON rendering.
//!
//! ## Execution Flow
//!
//! `phases::Engine::run` executes:
//!
//! 1.  **Precheck**: probe the platform; stop with a fatal outcome if it is
//!     unreachable.
//! 2.  **Execute**: run each spec on a bounded worker pool, isolating
//!     failures per repository.
//! 3.  **Hooks**: run the registered tasks against each successful
//!     repository.
//! 4.  **Aggregate**: collect everything into a report in input order.

pub mod builtin_tasks;
pub mod config;
pub mod error;
pub mod git;
pub mod output;
pub mod path;
pub mod phases;
pub mod precheck;
pub mod report;
pub mod repository;
pub mod spec;
pub mod task;
pub mod team;

#[cfg(test)]
mod path_proptest;
