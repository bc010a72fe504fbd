//! Callback for prettified playbook output.
//!
//! This module turns host-engine lifecycle events into an aligned,
//! colored progress report.
//!
//! # Architecture
//!
//! Components, leaf to root:
//!
//! 1. **[`ColorRenderer`]**: named palette entries to terminal colors
//! 2. **[`TerminalMetrics`]**: cached, floored output width
//! 3. **[`LineLayout`]**: symbol, label, dot fill, timing and status on one
//!    line, with word-aware wrapping for long labels
//! 4. **[`RoleChain`]**: finds the role a task belongs to
//! 5. **[`EventTracker`]**: consumes events, keeps the [`RenderState`]
//! 6. **[`SummaryReporter`]**: per-host counters and the completion line
//!
//! Data flows one way: event -> tracker -> layout -> output writer.
//!
//! # Quick Start with Prelude
//!
//! ```rust,ignore
//! use prettify::callback::prelude::*;
//!
//! let config = ConfigLoader::new().load()?;
//! let mut tracker = EventTracker::new(std::io::stdout(), config);
//!
//! tracker.handle(&DisplayEvent::PlayStarted { name: "Deploy".into() })?;
//! ```

pub mod color;
pub mod config;
pub mod layout;
pub mod role;
pub mod summary;
pub mod terminal;
pub mod tracker;
pub mod types;

// ============================================================================
// Re-exports (Flat access for convenience)
// ============================================================================

pub use color::{visible_width, ColorKey, ColorRenderer};
pub use config::{ConfigLayer, ConfigLoader, PrettifyConfig};
pub use layout::{LineLayout, LineSpec, RenderedLines, MIN_DOTS};
pub use role::{DirectRole, ParentRole, PathRole, RoleChain, RoleResolver};
pub use summary::{CompletionKind, SummaryReporter};
pub use terminal::{
    FixedProbe, TermProbe, TerminalMetrics, WidthProbe, FALLBACK_WIDTH, MIN_WIDTH,
};
pub use tracker::EventTracker;
pub use types::{DisplayEvent, EngineVersion, RenderState, StatusClassification, STATUS_WIDTH};

/// Convenient re-exports for driving the callback.
pub mod prelude {
    pub use crate::traits::{HostCounts, LifecycleCallback, ResultKind, TaskOutcome, TaskRef};

    pub use super::ConfigLoader;
    pub use super::DisplayEvent;
    pub use super::EventTracker;
    pub use super::LineLayout;
    pub use super::LineSpec;
    pub use super::PrettifyConfig;
    pub use super::StatusClassification;
}
