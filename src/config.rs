use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::constants;

/// Configuration problems that only surface when a component is built.
///
/// Loading and validating the file happens up front with `anyhow`; these
/// variants are carried as values so the write path can report them without
/// failing the read it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API key is missing: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("edge_config.edge_config_id is not set")]
    MissingEdgeConfigId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub github: GitHubConfig,

    pub cache: CacheConfig,

    pub edge_config: EdgeConfigSettings,

    pub scheduler: SchedulerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: String,

    /// `owner/name` of the repository whose issues are searched.
    pub repository: String,

    pub state: String,

    pub user_agent: String,

    pub request_timeout_seconds: u64,

    /// Environment variable holding an optional GitHub token. Anonymous
    /// requests work, a token only raises the rate limit.
    pub token_env: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: "calcom/cal.com".to_string(),
            state: "open".to_string(),
            user_agent: format!("issue-roulette/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_seconds: 30,
            token_env: None,
        }
    }
}

impl GitHubConfig {
    #[must_use]
    pub fn search_query(&self) -> String {
        format!("is:issue repo:{} state:{}", self.repository, self.state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    EdgeConfig,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    pub item_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            item_key: constants::CURRENT_ISSUE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfigSettings {
    pub api_url: String,

    pub edge_config_id: String,

    pub team_id: Option<String>,

    /// Environment variable holding the bearer token for the Vercel API.
    /// The token itself is never read from the config file.
    pub token_env: String,
}

impl Default for EdgeConfigSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.vercel.com".to_string(),
            edge_config_id: String::new(),
            team_id: None,
            token_env: "VERCEL_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,

    /// Six-field cron expression (with seconds). Takes precedence over the interval.
    pub cron_expression: Option<String>,

    pub refresh_interval_minutes: u32,

    pub run_on_startup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: None,
            refresh_interval_minutes: 60,
            run_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("issue-roulette").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".issue-roulette").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let repository = self.github.repository.trim();
        if repository.is_empty() {
            anyhow::bail!("github.repository cannot be empty");
        }
        if !repository.contains('/') {
            anyhow::bail!("github.repository must look like 'owner/name', got '{repository}'");
        }

        if self.cache.item_key.trim().is_empty() {
            anyhow::bail!("cache.item_key cannot be empty");
        }

        if self.scheduler.enabled
            && self.scheduler.refresh_interval_minutes == 0
            && self.scheduler.cron_expression.is_none()
        {
            anyhow::bail!("Scheduler interval must be > 0 or cron expression must be set");
        }

        Ok(())
    }

    #[must_use]
    pub fn uses_json_logs(&self) -> bool {
        self.general.log_format.eq_ignore_ascii_case("json")
    }
}
