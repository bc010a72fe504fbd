//! End-of-run summary.
//!
//! # Example Output
//!
//! ```text
//!   db1
//!     ✓ 8 successful
//!     ~ 4 changed
//!   web1
//!     ✓ 5 successful
//!     ~ 2 changed
//!     → 1 skipped
//!
//! 🚀 Deployment completed successfully in 42.7s
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use super::color::{ColorKey, ColorRenderer};
use super::types::StatusClassification;
use crate::traits::HostCounts;

/// Flavor of the completion line, picked from the invoked playbook name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// The playbook name mentions `deploy`
    Deployment,
    /// The playbook name mentions `provision`
    Provisioning,
    /// Anything else
    Playbook,
}

impl CompletionKind {
    /// Inspect the first `.yml`/`.yaml` argument of the engine invocation.
    pub fn from_args(args: &[String]) -> Self {
        let playbook = args
            .iter()
            .map(|arg| arg.to_lowercase())
            .find(|arg| arg.ends_with(".yml") || arg.ends_with(".yaml"))
            .unwrap_or_default();

        if playbook.contains("deploy") {
            CompletionKind::Deployment
        } else if playbook.contains("provision") {
            CompletionKind::Provisioning
        } else {
            CompletionKind::Playbook
        }
    }

    /// Completion message for a run that took `elapsed`.
    pub fn message(self, elapsed: Duration) -> String {
        let secs = elapsed.as_secs_f64();
        match self {
            CompletionKind::Deployment => {
                format!("🚀 Deployment completed successfully in {secs:.1}s")
            }
            CompletionKind::Provisioning => {
                format!("⚙️ Provisioning completed successfully in {secs:.1}s")
            }
            CompletionKind::Playbook => {
                format!("✅ Playbook completed successfully in {secs:.1}s")
            }
        }
    }
}

/// Formats the final per-host report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryReporter {
    colors: ColorRenderer,
}

impl SummaryReporter {
    /// Create a reporter drawing with `colors`.
    pub fn new(colors: ColorRenderer) -> Self {
        Self { colors }
    }

    /// Build the summary lines: hosts in lexicographic order, non-zero
    /// categories only, then the completion line.
    pub fn summarize(
        &self,
        stats: &BTreeMap<String, HostCounts>,
        elapsed: Duration,
        args: &[String],
    ) -> Vec<String> {
        let mut lines = vec![String::new()];

        for (host, counts) in stats {
            lines.push(self.colors.colorize(&format!("  {host}"), ColorKey::Info));
            lines.extend(self.host_lines(counts));
        }

        lines.push(String::new());
        lines.push(
            self.colors
                .colorize(&CompletionKind::from_args(args).message(elapsed), ColorKey::Success),
        );
        lines.push(String::new());
        lines
    }

    /// Indented category lines for one host.
    fn host_lines(&self, counts: &HostCounts) -> Vec<String> {
        StatusClassification::ALL
            .iter()
            .filter_map(|&status| {
                let count = status.count_in(counts);
                (count > 0).then(|| {
                    let text =
                        format!("{} {} {}", status.symbol(), count, status.summary_noun());
                    format!("    {}", self.colors.colorize(&text, status.color_key()))
                })
            })
            .collect()
    }
}
