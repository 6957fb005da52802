//! The stages of a batch run.
//!
//! ## Overview
//!
//! A batch goes through four stages:
//! 1. Precheck - one connectivity probe gates the whole batch (`orchestrator`)
//! 2. Execution - every spec is cloned or pushed on a bounded pool (`executor`)
//! 3. Hooks - registered tasks run against each repository that synced (`hooks`)
//! 4. Aggregation - outcomes land in per-index slots and are reported in
//!    input order (`aggregate`)
//!
//! Stages 2 and 3 run together per spec: a worker finishes one repository's
//! operation and tasks before it picks up another spec.

use std::any::Any;

pub mod aggregate;
pub mod executor;
pub mod hooks;
pub mod orchestrator;

pub use orchestrator::Engine;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
