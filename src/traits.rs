//! Core traits and host-facing data for prettify.
//!
//! The host engine (or the adapter standing in for it) describes tasks and
//! their results through the plain data types in this module and delivers
//! lifecycle notifications through [`LifecycleCallback`].

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Task Data
// ============================================================================

/// Uniform view of a task as exposed by the host engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRef {
    /// Task name as written in the playbook (may be blank)
    pub name: String,
    /// Action (module) identifier, e.g. `apt` or `ansible.builtin.copy`
    pub action: String,
    /// Role the task belongs to, if the engine knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parent task or block, for included and imported tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<TaskRef>>,
    /// Source file the task was loaded from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TaskRef {
    /// Creates a task reference with a name and action.
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    /// Sets the role of this task.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the parent of this task.
    pub fn with_parent(mut self, parent: TaskRef) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Sets the source file path of this task.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the label shown for this task.
    ///
    /// Blank names fall back to the action in brackets.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("[{}]", self.action)
        } else {
            self.name.clone()
        }
    }
}

// ============================================================================
// Result Data
// ============================================================================

/// Raw result kind reported by the host engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// The task ran to completion
    #[default]
    Ok,
    /// The task failed
    Failed,
    /// The task was skipped by a condition
    Skipped,
    /// The host could not be reached
    Unreachable,
}

/// Outcome of one task on one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOutcome {
    /// What the engine reported
    pub status: ResultKind,
    /// Whether the task changed the target
    pub changed: bool,
    /// Error or status message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl TaskOutcome {
    /// A successful result without changes.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A successful result that changed the target.
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Default::default()
        }
    }

    /// A failed result carrying an error message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            status: ResultKind::Failed,
            msg: Some(msg.into()),
            ..Default::default()
        }
    }

    /// A skipped result.
    pub fn skipped() -> Self {
        Self {
            status: ResultKind::Skipped,
            ..Default::default()
        }
    }
}

/// Final per-host counters reported by the host engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCounts {
    /// Tasks that completed
    pub ok: u32,
    /// Tasks that changed the host
    pub changed: u32,
    /// Tasks that failed
    pub failures: u32,
    /// Unreachable attempts
    pub unreachable: u32,
    /// Tasks that were skipped
    pub skipped: u32,
}

impl HostCounts {
    /// Check if the host saw any failure.
    pub fn has_failures(&self) -> bool {
        self.failures > 0 || self.unreachable > 0
    }
}

// ============================================================================
// Callback Trait
// ============================================================================

/// Receiver of host-engine lifecycle notifications.
///
/// The host calls these methods sequentially from a single thread. Every
/// method takes the instant at which the event happened so that recorded
/// streams can be replayed with their original timings. All methods default
/// to doing nothing.
pub trait LifecycleCallback {
    /// Called once before anything else.
    fn on_run_start(&mut self, engine_version: Option<&str>, at: Instant) -> Result<()> {
        let _ = (engine_version, at);
        Ok(())
    }

    /// Called when a play starts.
    fn on_play_start(&mut self, name: &str, at: Instant) -> Result<()> {
        let _ = (name, at);
        Ok(())
    }

    /// Called when a task starts.
    fn on_task_start(&mut self, task: &TaskRef, at: Instant) -> Result<()> {
        let _ = (task, at);
        Ok(())
    }

    /// Called when a task produced a result on a host.
    fn on_task_result(
        &mut self,
        host: &str,
        task: &TaskRef,
        outcome: &TaskOutcome,
        at: Instant,
    ) -> Result<()> {
        let _ = (host, task, outcome, at);
        Ok(())
    }

    /// Called once after the last play with the final per-host counters and
    /// the arguments the engine was invoked with.
    fn on_run_finish(
        &mut self,
        stats: &BTreeMap<String, HostCounts>,
        args: &[String],
        at: Instant,
    ) -> Result<()> {
        let _ = (stats, args, at);
        Ok(())
    }
}
