//! prettify - Aligned, colored playbook progress output
//!
//! Reads lifecycle events as JSON Lines from a file or stdin and renders them
//! on stdout. Diagnostics go to stderr.

mod cli;

use std::io;

use anyhow::{Context, Result};
use cli::Cli;
use prettify::callback::{ConfigLoader, EventTracker};
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    if cli.verbosity() >= 2 {
        eprintln!("prettify v{}", prettify::version());
    }

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e:#}");
        let code = e
            .downcast_ref::<prettify::error::Error>()
            .map_or(1, prettify::error::Error::exit_code);
        std::process::exit(code);
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let mut loader = ConfigLoader::new().with_overrides(cli.overrides());
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    debug!("Effective configuration: {:?}", config);

    let mut tracker = EventTracker::new(io::stdout(), config);

    let handled = match cli.input_path() {
        Some(path) => {
            let file = File::open(path)
                .await
                .map_err(prettify::error::Error::from)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            cli::stream::run_stream(BufReader::new(file), &mut tracker).await?
        }
        None => cli::stream::run_stream(BufReader::new(tokio::io::stdin()), &mut tracker).await?,
    };

    debug!("Rendered {} events", handled);
    Ok(())
}
