use anyhow::Context;
use contracts::domain::a025_style_capacity::AllocationPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capacity allocation settings
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct SizingConfig {
    /// `rounded` keeps per-share rounding, `largest_remainder` makes shares
    /// add up to the requested capacity
    #[serde(default)]
    pub allocation_policy: AllocationPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// EnvFilter directive, `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for `backend.log`; stdout only when absent
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[sizing]
allocation_policy = "rounded"

[logging]
level = "info"
"#;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    for config_path in candidate_paths() {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            return load_config_from_path(&config_path);
        }
        tracing::debug!("{} not found at: {}", CONFIG_FILE_NAME, config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    load_config_from_str(DEFAULT_CONFIG)
}

pub fn load_config_from_path(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    load_config_from_str(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn load_config_from_str(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join(CONFIG_FILE_NAME));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }
    paths
}
