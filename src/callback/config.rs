//! Configuration for the prettify callback.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Default values
//! 2. Configuration files (TOML)
//! 3. Environment variables
//! 4. CLI arguments
//!
//! # Configuration File Format
//!
//! ```toml
//! [prettify]
//! # Show per-task durations in result lines
//! show_timing = true
//! # Read but currently not rendered
//! show_timestamps = false
//! # Colored output
//! use_colors = true
//! # Fixed output width instead of querying the terminal
//! width = 100
//! ```
//!
//! # Environment Variables
//!
//! - `PRETTIFY_SHOW_TIMING` - Show task durations (true/false, default true)
//! - `PRETTIFY_SHOW_TIMESTAMPS` - Reserved (true/false, default false)
//! - `PRETTIFY_NO_COLOR` - Disable colors (true/false)
//! - `PRETTIFY_WIDTH` - Fixed output width
//! - `NO_COLOR` - Standard switch to disable colors
//!
//! The same settings are also read under the `ANSIBLE_PRETTIFY_` prefix
//! (`ANSIBLE_PRETTIFY_SHOW_TIMING`, ...); `PRETTIFY_` wins over it.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "PRETTIFY";

/// Prefix of the variables read by the Ansible callback plugin. Read before
/// [`ENV_PREFIX`], which wins when both are set.
pub const ANSIBLE_ENV_PREFIX: &str = "ANSIBLE_PRETTIFY";

// ============================================================================
// Configuration Types
// ============================================================================

/// Resolved settings for the prettify callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettifyConfig {
    /// Reserved; read from the environment but not rendered
    pub show_timestamps: bool,
    /// Whether result lines carry the task duration
    pub show_timing: bool,
    /// Whether to use colored output
    pub use_colors: bool,
    /// Fixed output width instead of the terminal's
    pub width: Option<usize>,
}

impl Default for PrettifyConfig {
    fn default() -> Self {
        Self {
            show_timestamps: false,
            show_timing: true,
            use_colors: true,
            width: None,
        }
    }
}

impl PrettifyConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every setting present in `layer`.
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.show_timestamps {
            self.show_timestamps = v;
        }
        if let Some(v) = layer.show_timing {
            self.show_timing = v;
        }
        if let Some(v) = layer.use_colors {
            self.use_colors = v;
        }
        if let Some(v) = layer.width {
            self.width = Some(v);
        }
    }
}

/// A partial configuration from one source. Unset fields leave the lower
/// layers untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    /// See [`PrettifyConfig::show_timestamps`]
    pub show_timestamps: Option<bool>,
    /// See [`PrettifyConfig::show_timing`]
    pub show_timing: Option<bool>,
    /// See [`PrettifyConfig::use_colors`]
    pub use_colors: Option<bool>,
    /// See [`PrettifyConfig::width`]
    pub width: Option<usize>,
}

/// Config files nest the settings under `[prettify]`.
#[derive(Debug, Default, Deserialize)]
struct FileWrapper {
    #[serde(default)]
    prettify: ConfigLayer,
}

// ============================================================================
// Configuration Loader
// ============================================================================

/// Builder for loading configuration from all sources.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Explicit configuration files, in order
    config_files: Vec<PathBuf>,
    /// Environment variable prefixes, lowest precedence first
    env_prefixes: Vec<String>,
    /// CLI overrides
    cli_overrides: ConfigLayer,
    /// Whether to load from the user config directory
    load_standard_locations: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self {
            config_files: Vec::new(),
            env_prefixes: Vec::new(),
            cli_overrides: ConfigLayer::default(),
            load_standard_locations: true,
        }
        .with_env_prefix(ANSIBLE_ENV_PREFIX)
        .with_env_prefix(ENV_PREFIX)
    }

    /// Add a configuration file to load. It must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Add an environment variable prefix. Later prefixes win.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefixes.push(prefix.into());
        self
    }

    /// Disable environment variable loading.
    pub fn without_env(mut self) -> Self {
        self.env_prefixes.clear();
        self
    }

    /// Disable loading from the user config directory.
    pub fn without_standard_locations(mut self) -> Self {
        self.load_standard_locations = false;
        self
    }

    /// Set the CLI overrides.
    pub fn with_overrides(mut self, overrides: ConfigLayer) -> Self {
        self.cli_overrides = overrides;
        self
    }

    /// Load configuration from all sources.
    pub fn load(self) -> Result<PrettifyConfig> {
        let mut config = PrettifyConfig::default();

        if self.load_standard_locations {
            for path in Self::standard_config_paths() {
                if path.exists() {
                    debug!("Loading prettify config from: {}", path.display());
                    match Self::load_file(&path) {
                        Ok(layer) => config.merge(layer),
                        Err(e) => warn!("Ignoring config {}: {}", path.display(), e),
                    }
                }
            }
        }

        for path in &self.config_files {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.clone()));
            }
            debug!("Loading prettify config from: {}", path.display());
            config.merge(Self::load_file(path)?);
        }

        for prefix in &self.env_prefixes {
            config.merge(Self::load_from_env(prefix, |key| env::var(key).ok()));
        }

        config.merge(self.cli_overrides);

        Ok(config)
    }

    /// Standard configuration file locations.
    fn standard_config_paths() -> Vec<PathBuf> {
        dirs::config_dir()
            .map(|dir| vec![dir.join("prettify").join("config.toml")])
            .unwrap_or_default()
    }

    /// Load one configuration file.
    fn load_file(path: &Path) -> Result<ConfigLayer> {
        let content = fs::read_to_string(path)?;
        let wrapper: FileWrapper = toml::from_str(&content)?;
        Ok(wrapper.prettify)
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    fn load_from_env(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(val) = lookup(&format!("{prefix}_SHOW_TIMESTAMPS")) {
            layer.show_timestamps = Some(parse_bool(&val));
        }

        if let Some(val) = lookup(&format!("{prefix}_SHOW_TIMING")) {
            layer.show_timing = Some(parse_bool(&val));
        }

        if let Some(val) = lookup(&format!("{prefix}_NO_COLOR")) {
            if parse_bool(&val) {
                layer.use_colors = Some(false);
            }
        }
        // Also check standard NO_COLOR
        if lookup("NO_COLOR").is_some() {
            layer.use_colors = Some(false);
        }

        if let Some(val) = lookup(&format!("{prefix}_WIDTH")) {
            match val.trim().parse::<usize>() {
                Ok(width) => layer.width = Some(width),
                Err(_) => warn!("Ignoring invalid {}_WIDTH value: {}", prefix, val),
            }
        }

        layer
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(val: &str) -> bool {
    let val = val.trim();
    val.eq_ignore_ascii_case("true") || val == "1"
}
