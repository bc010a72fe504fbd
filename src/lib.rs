//! # Prettify - Aligned Progress Output for Playbook Runs
//!
//! Prettify renders the lifecycle events of an Ansible-style automation run
//! as a compact, aligned and colored terminal report: one line per task
//! result with a status symbol, a dot-filled label, the task duration and a
//! fixed-width status word, grouped under role headers and closed by a
//! per-host summary.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Host engine / JSONL stream                      │
//! │            (run, play, task start, task result, run end)             │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            EventTracker                              │
//! │          (render state, role grouping, timing, classification)       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┼─────────────────────────┐
//!          ▼                         ▼                         ▼
//! ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────────┐
//! │   LineLayout    │   │   TerminalMetrics   │   │   SummaryReporter   │
//! │  (dots, wrap,   │   │  (cached width,     │   │  (per-host counts,  │
//! │   truncation)   │   │   60 col floor)     │   │   completion line)  │
//! └─────────────────┘   └─────────────────────┘   └─────────────────────┘
//!          │                                                   │
//!          └───────────────────────┬───────────────────────────┘
//!                                  ▼
//!                     ┌─────────────────────────┐
//!                     │      ColorRenderer      │
//!                     └─────────────────────────┘
//! ```
//!
//! ## Example Output
//!
//! ```text
//! PLAY [Deploy web tier]
//!
//!
//! ┌─ webserver
//!   ✓ Gather facts ...............................12ms DONE
//!   ~ Install nginx .............................840ms CHANGED
//!   → Remove legacy config .........................1ms SKIPPED
//! ```
//!
//! ## Driving the Callback
//!
//! ```rust,ignore
//! use prettify::prelude::*;
//!
//! let config = ConfigLoader::new().load()?;
//! let mut tracker = EventTracker::new(std::io::stdout(), config);
//!
//! tracker.handle(&DisplayEvent::PlayStarted { name: "Deploy".into() })?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.
    //!
    //! See [`callback::prelude`] for the callback-only subset.
    //!
    //! [`callback::prelude`]: crate::callback::prelude

    // Error handling
    pub use crate::error::{Error, Result};

    // Core traits and event payloads
    pub use crate::traits::*;

    // Callback components
    pub use crate::callback::{
        ColorRenderer, ConfigLoader, DisplayEvent, EventTracker, LineLayout, LineSpec,
        PrettifyConfig, RoleChain, StatusClassification, SummaryReporter, TerminalMetrics,
    };
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases for prettify operations.
pub mod error;

/// The lifecycle callback interface and the event payloads it carries.
pub mod traits;

/// Rendering of lifecycle events.
///
/// - [`EventTracker`](callback::EventTracker): consumes events and writes lines
/// - [`LineLayout`](callback::LineLayout): the aligned result line
/// - [`SummaryReporter`](callback::SummaryReporter): the end-of-run report
pub mod callback;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of prettify.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
