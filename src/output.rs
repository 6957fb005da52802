//! # Output
//!
//! Rendering of a `BatchOutcome` for people and for machines, plus the color
//! and emoji controls the command-line tool applies.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bulk_repo::output::{render_text, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! print!("{}", render_text(&outcome, &config));
//! ```

use std::env;
use std::fmt::Write as _;

use console::style;

use crate::report::{BatchOutcome, BatchReport, OperationOutcome, RepoReport, Verdict};
use crate::task::TaskStatus;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never", or "auto".
    /// In auto mode colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even if empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn verdict_marker(config: &OutputConfig, verdict: Verdict) -> String {
    let marker = match verdict {
        Verdict::Success => emoji(config, "✅", "[OK]"),
        Verdict::Warning => emoji(config, "⚠️", "[WARN]"),
        Verdict::Error => emoji(config, "❌", "[ERR]"),
        Verdict::Fatal => emoji(config, "🛑", "[FATAL]"),
    };
    marker.to_string()
}

fn styled_verdict(config: &OutputConfig, verdict: Verdict) -> String {
    let text = style(verdict.to_string()).force_styling(config.use_color);
    let text = match verdict {
        Verdict::Success => text.green(),
        Verdict::Warning => text.yellow(),
        Verdict::Error | Verdict::Fatal => text.red().bold(),
    };
    text.to_string()
}

fn write_repo(out: &mut String, config: &OutputConfig, repo: &RepoReport) {
    let status = repo.status();
    let spec = status.spec();
    let _ = write!(
        out,
        "{} {} {} ({}): {}",
        verdict_marker(config, repo.verdict()),
        spec.kind(),
        style(spec.repo_name()).bold().force_styling(config.use_color),
        spec.path().display(),
        status.outcome()
    );
    if let Some(error) = status.error() {
        let _ = write!(out, " - {}", error);
    }
    out.push('\n');

    for result in repo.results() {
        let marker = match result.status() {
            TaskStatus::Success => emoji(config, "✔", "[ok]"),
            TaskStatus::Warning => emoji(config, "⚠", "[warn]"),
            TaskStatus::Error => emoji(config, "✘", "[err]"),
        };
        let _ = writeln!(
            out,
            "    {} {} {}: {}",
            marker,
            result.name(),
            styled_verdict(config, Verdict::from(result.status())),
            result.message()
        );
    }
}

fn write_summary(out: &mut String, config: &OutputConfig, report: &BatchReport) {
    let (completed, up_to_date, failed) = report.outcome_counts();
    let _ = writeln!(
        out,
        "\n{} Summary: {} repositories, {} {}, {} {}, {} {}; verdict: {}",
        emoji(config, "📊", "[INFO]"),
        report.len(),
        completed,
        OperationOutcome::Completed,
        up_to_date,
        OperationOutcome::AlreadyUpToDate,
        failed,
        OperationOutcome::Failed,
        styled_verdict(config, report.verdict())
    );
}

/// Human-readable report: one line per repository in batch order, task
/// results indented beneath it, then a summary line.
pub fn render_text(outcome: &BatchOutcome, config: &OutputConfig) -> String {
    let mut out = String::new();
    match outcome {
        BatchOutcome::Fatal { reason } => {
            let _ = writeln!(
                out,
                "{} Precheck failed, nothing was run: {}",
                verdict_marker(config, Verdict::Fatal),
                reason
            );
            let _ = writeln!(
                out,
                "verdict: {}",
                styled_verdict(config, Verdict::Fatal)
            );
        }
        BatchOutcome::Finished { report } => {
            for repo in report.repos() {
                write_repo(&mut out, config, repo);
            }
            write_summary(&mut out, config, report);
        }
    }
    out
}

/// The whole outcome as pretty-printed JSON.
pub fn render_json(outcome: &BatchOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}
