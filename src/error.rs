//! # Error Handling
//!
//! This module defines the centralized error type for the `bulk-repo`
//! library. It uses `thiserror` to derive an `Error` enum covering every
//! failure mode the engine and its collaborators can hit, each variant
//! carrying enough context to produce an actionable message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - spec construction (`InvalidSpec`, `DuplicateDestination`),
//!   - external tool and environment failures (`GitCommand`, `GitClone`,
//!     `NotARepository`, `StateMismatch`, `Unreachable`, `WorkerPool`),
//!   - configuration and wrapped library errors (`ConfigParse`, `Io`,
//!     `Glob`, `UrlParse`). YAML errors are reported as `ConfigParse` so
//!     they always carry a hint.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Per-repository and per-task failures never escape the engine as `Error`;
//! they are folded into `OperationStatus` and `TaskResult` values. Only
//! construction-time problems and the fatal connectivity precheck surface
//! as errors to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for bulk-repo operations
#[derive(Error, Debug)]
pub enum Error {
    /// A team, repository name or spec field failed validation.
    #[error("Invalid spec: {message}")]
    InvalidSpec { message: String },

    /// Two specs in one batch resolve to the same local destination.
    #[error("Duplicate destination in batch: {}", path.display())]
    DuplicateDestination { path: PathBuf },

    /// A git subcommand exited unsuccessfully or could not be spawned.
    ///
    /// `code` is `None` when the process was killed by a signal or never
    /// started.
    #[error("Git command failed for {target}: git {command} (exit {}) - {stderr}", code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()))]
    GitCommand {
        command: String,
        target: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A clone failed.
    ///
    /// Includes the repository URL, the git output, and an optional hint for
    /// resolution.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A path that should hold a git working tree does not.
    #[error("Not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// An existing working tree tracks a different remote or branch than the
    /// spec asks for.
    #[error("Repository state mismatch at {}: {message}", path.display())]
    StateMismatch { path: PathBuf, message: String },

    /// The hosting platform could not be reached before the batch started.
    #[error("Platform unreachable: {target} - {message}")]
    Unreachable { target: String, message: String },

    /// An error occurred while parsing the plan file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The bounded worker pool could not be created.
    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Shorthand for building an `InvalidSpec` error.
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Error::InvalidSpec {
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
