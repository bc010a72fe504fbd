//! Event tracker: turns lifecycle events into report lines.
//!
//! # Example Output
//!
//! ```text
//!
//! PLAY [Deploy application]
//!
//!
//! ┌─ nginx
//!   ✓ Gather package facts ......................312ms DONE
//!   ~ Install nginx .............................1840ms CHANGED
//!   ✗ Start nginx ...............................95ms FAILED
//!     Error: Unit nginx.service not found.
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prettify::callback::{EventTracker, PrettifyConfig};
//!
//! let mut tracker = EventTracker::new(std::io::stdout(), PrettifyConfig::default());
//! tracker.handle(&event)?;
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use tracing::{debug, trace};

use super::color::{ColorKey, ColorRenderer};
use super::config::PrettifyConfig;
use super::layout::{LineLayout, LineSpec};
use super::role::RoleChain;
use super::summary::SummaryReporter;
use super::terminal::TerminalMetrics;
use super::types::{DisplayEvent, EngineVersion, RenderState, StatusClassification};
use crate::error::Result;
use crate::traits::{HostCounts, LifecycleCallback, TaskOutcome, TaskRef};

/// Play name shown when a play has none.
const UNNAMED_PLAY: &str = "Unnamed Play";

/// Consumes lifecycle events and writes the rendered report to `W`.
///
/// Events must be delivered one at a time, in order. All state lives in the
/// tracker's [`RenderState`].
#[derive(Debug)]
pub struct EventTracker<W: Write> {
    out: W,
    config: PrettifyConfig,
    colors: ColorRenderer,
    layout: LineLayout,
    summary: SummaryReporter,
    roles: RoleChain,
    state: RenderState,
}

impl<W: Write> EventTracker<W> {
    /// Create a tracker writing to `out`.
    ///
    /// The output width comes from `config.width` when set, otherwise from
    /// the terminal attached to stdout.
    pub fn new(out: W, config: PrettifyConfig) -> Self {
        let metrics = match config.width {
            Some(width) => TerminalMetrics::fixed(width),
            None => TerminalMetrics::terminal(),
        };
        let colors = ColorRenderer::new(config.use_colors);

        Self {
            out,
            config,
            colors,
            layout: LineLayout::new(colors),
            summary: SummaryReporter::new(colors),
            roles: RoleChain::default(),
            state: RenderState::new(metrics, Instant::now()),
        }
    }

    /// Replace the width source.
    pub fn with_metrics(mut self, metrics: TerminalMetrics) -> Self {
        self.state.metrics = metrics;
        self
    }

    /// Current render state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &PrettifyConfig {
        &self.config
    }

    /// The output writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the tracker, returning the output writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Handle an event that happened now.
    pub fn handle(&mut self, event: &DisplayEvent) -> Result<()> {
        self.handle_at(event, Instant::now())
    }

    /// Handle an event that happened at `at`.
    pub fn handle_at(&mut self, event: &DisplayEvent, at: Instant) -> Result<()> {
        trace!(event = event.event_type(), "Handling event");
        match event {
            DisplayEvent::RunStarted { engine_version } => {
                self.on_run_start(engine_version.as_deref(), at)
            }
            DisplayEvent::PlayStarted { name } => self.on_play_start(name, at),
            DisplayEvent::TaskStarted { task } => self.on_task_start(task, at),
            DisplayEvent::TaskResult {
                host,
                task,
                outcome,
            } => self.on_task_result(host, task, outcome, at),
            DisplayEvent::RunFinished { stats, args } => self.on_run_finish(stats, args, at),
        }
    }

    // ========================================================================
    // Output Helpers
    // ========================================================================

    fn emit<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Role header lines when `role` starts a new group, else nothing.
    fn role_header(&mut self, role: &str) -> Option<[String; 2]> {
        if role.is_empty() || self.state.last_role.as_deref() == Some(role) {
            return None;
        }
        debug!(role, "Entering role");
        self.state.last_role = Some(role.to_string());
        Some([
            String::new(),
            self.colors.colorize(&format!("┌─ {role}"), ColorKey::Info),
        ])
    }

    fn timing_text(&self, at: Instant) -> Option<String> {
        if !self.config.show_timing {
            return None;
        }
        self.state
            .task_start
            .map(|start| format!("{}ms", at.saturating_duration_since(start).as_millis()))
    }
}

impl<W: Write> LifecycleCallback for EventTracker<W> {
    fn on_run_start(&mut self, engine_version: Option<&str>, at: Instant) -> Result<()> {
        self.state.overall_start = at;
        self.state.engine_version = EngineVersion::detect(engine_version);
        debug!(
            version = %self.state.engine_version.raw,
            major = self.state.engine_version.major,
            minor = self.state.engine_version.minor,
            show_timestamps = self.config.show_timestamps,
            "Run started"
        );
        Ok(())
    }

    fn on_play_start(&mut self, name: &str, _at: Instant) -> Result<()> {
        self.state.metrics.invalidate();

        let name = match name.trim() {
            "" => UNNAMED_PLAY,
            trimmed => trimmed,
        };
        debug!(play = name, "Play started");

        let header = self.colors.colorize(&format!("PLAY [{name}]"), ColorKey::Info);
        self.emit([String::new(), header, String::new()])
    }

    fn on_task_start(&mut self, task: &TaskRef, at: Instant) -> Result<()> {
        trace!(task = %task.name, "Task started");
        self.state.task_start = Some(at);
        Ok(())
    }

    fn on_task_result(
        &mut self,
        host: &str,
        task: &TaskRef,
        outcome: &TaskOutcome,
        at: Instant,
    ) -> Result<()> {
        let status = StatusClassification::classify(outcome);
        let label = task.display_name();
        trace!(host, task = %label, %status, "Task result");

        let role = self.roles.resolve(task);
        let header = self.role_header(&role);

        let timing = self.timing_text(at);
        let width = self.state.metrics.width();
        let mut spec = LineSpec::new(&label, status, width);
        if let Some(timing) = timing.as_deref() {
            spec = spec.with_timing(timing);
        }
        if let Some(msg) = outcome.msg.as_deref() {
            spec = spec.with_error(msg);
        }
        let rendered = self.layout.render(&spec);

        self.emit(header.into_iter().flatten().chain(rendered))
    }

    fn on_run_finish(
        &mut self,
        stats: &BTreeMap<String, HostCounts>,
        args: &[String],
        at: Instant,
    ) -> Result<()> {
        let elapsed = at.saturating_duration_since(self.state.overall_start);
        let failed_hosts = stats.values().filter(|c| c.has_failures()).count();
        debug!(
            hosts = stats.len(),
            failed_hosts,
            elapsed_secs = elapsed.as_secs_f64(),
            "Run finished"
        );
        let lines = self.summary.summarize(stats, elapsed, args);
        self.emit(lines)
    }
}
