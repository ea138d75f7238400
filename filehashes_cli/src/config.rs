use crate::output::OutputFormat;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use filehashes_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file stopped requests are written to on Ctrl-C
pub const DEFAULT_SAVE_STATE: &str = "filehashes-resume.json";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HashingConfig {
    /// Algorithms used when none are given on the command line
    pub algorithms: Vec<String>,
    pub save_state: PathBuf,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_enabled: bool,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithms: vec!["sha256".to_string()],
            save_state: PathBuf::from(DEFAULT_SAVE_STATE),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color_enabled: true,
        }
    }
}

/// Values given on the command line; `None` leaves the loaded value alone
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub algorithms: Vec<String>,
    pub concurrency: Option<usize>,
    pub buffer_size: Option<usize>,
    pub format: Option<OutputFormat>,
    pub save_state: Option<PathBuf>,
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if !overrides.algorithms.is_empty() {
            self.hashing.algorithms = overrides.algorithms.clone();
        }
        if let Some(concurrency) = overrides.concurrency {
            self.engine.concurrency = concurrency;
        }
        if let Some(size) = overrides.buffer_size {
            self.engine.buffer_size = size;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(path) = &overrides.save_state {
            self.hashing.save_state = path.clone();
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager reading a specific file
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the default XDG-compliant configuration path
    fn default_config_path() -> PathBuf {
        // Check for XDG_CONFIG_HOME override first (Linux/macOS)
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("filehashes/config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("filehashes")
            .join("config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    ///
    /// Command-line values are applied on top by the caller.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables, e.g. FILEHASHES_ENGINE__CONCURRENCY=2
        figment = figment.merge(Env::prefixed("FILEHASHES_").split("__"));

        figment.extract().context("Failed to load configuration")
    }
}
