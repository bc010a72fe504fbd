//! CLI module for prettify
//!
//! Argument parsing and the event stream adapter.

pub mod stream;

use clap::Parser;
use prettify::callback::ConfigLayer;
use std::path::PathBuf;

/// prettify - Aligned, colored playbook progress output
///
/// Reads lifecycle events as JSON Lines and renders them for a terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "prettify")]
#[command(author = "Prettify Contributors")]
#[command(version)]
#[command(about = "Aligned, colored playbook progress output", long_about = None)]
pub struct Cli {
    /// Event stream to read (JSON Lines). Reads stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "PRETTIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Hide per-task durations
    #[arg(long)]
    pub no_timing: bool,

    /// Render for a fixed width instead of the terminal's
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Verbosity level for diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Input file, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Settings given on the command line. Flags that were not passed leave
    /// the lower configuration layers alone.
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            show_timestamps: None,
            show_timing: self.no_timing.then_some(false),
            use_colors: self.no_color.then_some(false),
            width: self.width,
        }
    }
}
