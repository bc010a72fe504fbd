//! Terminal width detection.
//!
//! Querying the terminal costs a system call, so the width is read once and
//! cached until [`TerminalMetrics::invalidate`] is called. The tracker
//! invalidates at every play start since the terminal may have been resized
//! between sections.

use std::fmt::Debug;

use console::Term;
use tracing::debug;

/// Narrowest width the layout will ever be computed for.
pub const MIN_WIDTH: usize = 60;

/// Width used when the terminal cannot be queried.
pub const FALLBACK_WIDTH: usize = 80;

/// Source of the raw terminal width.
pub trait WidthProbe: Debug + Send + Sync {
    /// Current width in columns, or `None` when it cannot be determined.
    fn columns(&self) -> Option<usize>;
}

/// Reads the width of the terminal attached to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermProbe;

impl WidthProbe for TermProbe {
    fn columns(&self) -> Option<usize> {
        Term::stdout()
            .size_checked()
            .map(|(_rows, cols)| usize::from(cols))
    }
}

/// Reports a fixed width. Used for configured overrides and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Option<usize>);

impl WidthProbe for FixedProbe {
    fn columns(&self) -> Option<usize> {
        self.0
    }
}

/// Cached, floored output width.
#[derive(Debug)]
pub struct TerminalMetrics {
    probe: Box<dyn WidthProbe>,
    cached: Option<usize>,
}

impl TerminalMetrics {
    /// Create metrics backed by `probe`.
    pub fn new(probe: Box<dyn WidthProbe>) -> Self {
        Self {
            probe,
            cached: None,
        }
    }

    /// Metrics for the real terminal.
    pub fn terminal() -> Self {
        Self::new(Box::new(TermProbe))
    }

    /// Metrics that always report `width` (still subject to [`MIN_WIDTH`]).
    pub fn fixed(width: usize) -> Self {
        Self::new(Box::new(FixedProbe(Some(width))))
    }

    /// Output width, at least [`MIN_WIDTH`].
    pub fn width(&mut self) -> usize {
        if let Some(width) = self.cached {
            return width;
        }
        let width = match self.probe.columns() {
            Some(cols) => cols.max(MIN_WIDTH),
            None => {
                debug!("Terminal width unavailable, using {}", FALLBACK_WIDTH);
                FALLBACK_WIDTH
            }
        };
        self.cached = Some(width);
        width
    }

    /// Drop the cached width; the next [`width`](Self::width) call re-queries.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// The cached width, if any.
    pub fn cached(&self) -> Option<usize> {
        self.cached
    }
}

impl Default for TerminalMetrics {
    fn default() -> Self {
        Self::terminal()
    }
}
