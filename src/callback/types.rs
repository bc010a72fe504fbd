//! Event and state types for the prettify callback.
//!
//! ## Event Categories
//!
//! - **Run Events**: start of the run, final per-host counters
//! - **Play Events**: start of each play (a new output section)
//! - **Task Events**: task start and per-host task results

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::color::ColorKey;
use super::terminal::TerminalMetrics;
use crate::traits::{HostCounts, ResultKind, TaskOutcome, TaskRef};

// ============================================================================
// Display Events
// ============================================================================

/// Lifecycle events consumed by the tracker.
///
/// Each event carries only what rendering needs. Events are consumed once and
/// then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DisplayEvent {
    /// The run started.
    RunStarted {
        /// Version string of the host engine, when known
        #[serde(default)]
        engine_version: Option<String>,
    },

    /// A play started.
    PlayStarted {
        /// Play name (may be blank)
        #[serde(default)]
        name: String,
    },

    /// A task started.
    TaskStarted {
        /// The task about to run
        task: TaskRef,
    },

    /// A task produced a result on a host.
    TaskResult {
        /// Host the result belongs to
        #[serde(default)]
        host: String,
        /// The task that produced the result
        task: TaskRef,
        /// What happened
        #[serde(default)]
        outcome: TaskOutcome,
    },

    /// The run finished.
    RunFinished {
        /// Final counters per host
        #[serde(default)]
        stats: BTreeMap<String, HostCounts>,
        /// Arguments the host engine was invoked with
        #[serde(default)]
        args: Vec<String>,
    },
}

impl DisplayEvent {
    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            DisplayEvent::RunStarted { .. } => "run_started",
            DisplayEvent::PlayStarted { .. } => "play_started",
            DisplayEvent::TaskStarted { .. } => "task_started",
            DisplayEvent::TaskResult { .. } => "task_result",
            DisplayEvent::RunFinished { .. } => "run_finished",
        }
    }
}

// ============================================================================
// Status Classification
// ============================================================================

/// Display classification of a task result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClassification {
    /// Completed without changes
    Success,
    /// Completed and changed the target
    Changed,
    /// Failed
    Failed,
    /// Skipped
    Skipped,
    /// Host unreachable
    Unreachable,
}

/// Width of the status field: the longest status word.
pub const STATUS_WIDTH: usize = StatusClassification::longest_label();

impl StatusClassification {
    /// Every classification, in summary order.
    pub const ALL: [StatusClassification; 5] = [
        StatusClassification::Success,
        StatusClassification::Changed,
        StatusClassification::Failed,
        StatusClassification::Unreachable,
        StatusClassification::Skipped,
    ];

    /// Classify a host result. A changed flag on a completed result wins over
    /// plain success; the other kinds ignore it.
    pub fn classify(outcome: &TaskOutcome) -> Self {
        match outcome.status {
            ResultKind::Ok if outcome.changed => StatusClassification::Changed,
            ResultKind::Ok => StatusClassification::Success,
            ResultKind::Failed => StatusClassification::Failed,
            ResultKind::Skipped => StatusClassification::Skipped,
            ResultKind::Unreachable => StatusClassification::Unreachable,
        }
    }

    /// Status symbol shown before the task label.
    pub fn symbol(self) -> &'static str {
        match self {
            StatusClassification::Success => "✓",
            StatusClassification::Changed => "~",
            StatusClassification::Failed => "✗",
            StatusClassification::Skipped => "→",
            StatusClassification::Unreachable => "⚠",
        }
    }

    /// Color used for the symbol and status word.
    pub fn color_key(self) -> ColorKey {
        match self {
            StatusClassification::Success => ColorKey::Success,
            StatusClassification::Changed => ColorKey::Changed,
            StatusClassification::Failed => ColorKey::Failed,
            StatusClassification::Skipped => ColorKey::Skipped,
            StatusClassification::Unreachable => ColorKey::Unreachable,
        }
    }

    /// Status word shown at the end of a result line.
    pub const fn label(self) -> &'static str {
        match self {
            StatusClassification::Success => "DONE",
            StatusClassification::Changed => "CHANGED",
            StatusClassification::Failed => "FAILED",
            StatusClassification::Skipped => "SKIPPED",
            StatusClassification::Unreachable => "UNREACHABLE",
        }
    }

    /// Status word right-padded to [`STATUS_WIDTH`].
    pub fn padded_label(self) -> String {
        format!("{:<width$}", self.label(), width = STATUS_WIDTH)
    }

    /// Noun used for this category in the final summary.
    pub fn summary_noun(self) -> &'static str {
        match self {
            StatusClassification::Success => "successful",
            StatusClassification::Changed => "changed",
            StatusClassification::Failed => "failed",
            StatusClassification::Skipped => "skipped",
            StatusClassification::Unreachable => "unreachable",
        }
    }

    /// Pick this category's counter out of a host summary.
    pub fn count_in(self, counts: &HostCounts) -> u32 {
        match self {
            StatusClassification::Success => counts.ok,
            StatusClassification::Changed => counts.changed,
            StatusClassification::Failed => counts.failures,
            StatusClassification::Skipped => counts.skipped,
            StatusClassification::Unreachable => counts.unreachable,
        }
    }

    const fn longest_label() -> usize {
        let mut longest = 0;
        let mut i = 0;
        while i < Self::ALL.len() {
            let len = Self::ALL[i].label().len();
            if len > longest {
                longest = len;
            }
            i += 1;
        }
        longest
    }
}

impl fmt::Display for StatusClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Engine Version
// ============================================================================

/// Version of the host engine, used for compatibility decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineVersion {
    /// Version string as reported, or `unknown`
    pub raw: String,
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl EngineVersion {
    /// Version assumed when the engine does not report a usable one.
    pub fn fallback() -> Self {
        Self {
            raw: "unknown".to_string(),
            major: 2,
            minor: 9,
        }
    }

    /// Parse `major[.minor[...]]`. A missing minor component reads as 0.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let mut parts = raw.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(part) => part.parse().ok()?,
            None => 0,
        };
        Some(Self {
            raw: raw.to_string(),
            major,
            minor,
        })
    }

    /// Parse the reported version, falling back to [`EngineVersion::fallback`].
    pub fn detect(reported: Option<&str>) -> Self {
        reported
            .and_then(Self::parse)
            .unwrap_or_else(Self::fallback)
    }
}

// ============================================================================
// Render State
// ============================================================================

/// Mutable state carried between events.
///
/// Owned by the tracker and only changed in response to events.
#[derive(Debug)]
pub struct RenderState {
    /// When the run started
    pub overall_start: Instant,
    /// When the most recent task started
    pub task_start: Option<Instant>,
    /// Role of the last role header printed
    pub last_role: Option<String>,
    /// Host engine version seen at run start
    pub engine_version: EngineVersion,
    /// Output width, cached per play
    pub metrics: TerminalMetrics,
}

impl RenderState {
    /// Fresh state anchored at `now`.
    pub fn new(metrics: TerminalMetrics, now: Instant) -> Self {
        Self {
            overall_start: now,
            task_start: None,
            last_role: None,
            engine_version: EngineVersion::fallback(),
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_wins_over_success() {
        assert_eq!(
            StatusClassification::classify(&TaskOutcome::changed()),
            StatusClassification::Changed
        );
        assert_eq!(
            StatusClassification::classify(&TaskOutcome::ok()),
            StatusClassification::Success
        );
    }

    #[test]
    fn test_failed_ignores_changed_flag() {
        let mut outcome = TaskOutcome::failed("boom");
        outcome.changed = true;
        assert_eq!(
            StatusClassification::classify(&outcome),
            StatusClassification::Failed
        );
    }

    #[test]
    fn test_status_width_is_longest_word() {
        assert_eq!(STATUS_WIDTH, "UNREACHABLE".len());
        for status in StatusClassification::ALL {
            assert_eq!(status.padded_label().len(), STATUS_WIDTH);
        }
    }

    #[test]
    fn test_event_type_names() {
        let event: DisplayEvent =
            serde_json::from_str(r#"{"event_type":"play_started","name":"Deploy"}"#).unwrap();
        assert_eq!(event.event_type(), "play_started");
        assert_eq!(
            event,
            DisplayEvent::PlayStarted {
                name: "Deploy".to_string()
            }
        );
    }

    #[test]
    fn test_run_finished_defaults() {
        let event: DisplayEvent =
            serde_json::from_str(r#"{"event_type":"run_finished"}"#).unwrap();
        match event {
            DisplayEvent::RunFinished { stats, args } => {
                assert!(stats.is_empty());
                assert!(args.is_empty());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_engine_version_parse() {
        let v = EngineVersion::parse("2.15.3").unwrap();
        assert_eq!((v.major, v.minor), (2, 15));
        let v = EngineVersion::parse("3").unwrap();
        assert_eq!((v.major, v.minor), (3, 0));
        assert!(EngineVersion::parse("core").is_none());
        assert!(EngineVersion::parse("2.x").is_none());
    }

    #[test]
    fn test_engine_version_fallback() {
        assert_eq!(EngineVersion::detect(None), EngineVersion::fallback());
        assert_eq!(EngineVersion::detect(Some("garbage")).minor, 9);
    }
}
