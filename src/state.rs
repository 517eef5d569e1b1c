use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::edge_config::EdgeConfigClient;
use crate::clients::github::GitHubClient;
use crate::config::{CacheBackend, Config, ConfigError};
use crate::services::{
    CacheHandle, IssueCache, IssueFetcher, IssueService, IssueSource, MemoryIssueCache,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Both upstream clients reuse it so connections are pooled.
fn build_shared_http_client(
    timeout_seconds: u64,
    user_agent: &str,
) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Secrets resolved outside the config file.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Bearer token for the cache store.
    pub store_token: Option<String>,

    /// Optional GitHub token, only used to raise the search rate limit.
    pub github_token: Option<String>,
}

impl Credentials {
    /// Reads the variables named in the config. Empty values count as unset.
    #[must_use]
    pub fn from_env(config: &Config) -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            store_token: read(&config.edge_config.token_env),
            github_token: config.github.token_env.as_deref().and_then(read),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("store_token", &self.store_token.as_ref().map(|_| "<redacted>"))
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub issues: Arc<IssueService>,
}

impl SharedState {
    pub fn new(config: Config, credentials: Credentials) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(
            config.github.request_timeout_seconds,
            &config.github.user_agent,
        )?;

        let github = GitHubClient::new(
            http_client.clone(),
            &config.github,
            credentials.github_token.clone(),
        );
        info!("Issue search query: {}", github.query());

        let cache = build_cache(&config, http_client, &credentials);
        if let Err(e) = &cache {
            warn!("Cache store unavailable, writes will be skipped: {}", e);
        }

        Ok(Self::with_backends(config, Arc::new(github), cache))
    }

    /// Wires the service around explicit backends.
    #[must_use]
    pub fn with_backends(config: Config, source: Arc<dyn IssueSource>, cache: CacheHandle) -> Self {
        let issues = IssueService::with_cache(IssueFetcher::new(source), cache, &config.cache.item_key);

        Self {
            config: Arc::new(config),
            issues: Arc::new(issues),
        }
    }
}

fn build_cache(config: &Config, http_client: reqwest::Client, credentials: &Credentials) -> CacheHandle {
    match config.cache.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryIssueCache::new()) as Arc<dyn IssueCache>),
        CacheBackend::EdgeConfig => {
            let token = credentials
                .store_token
                .clone()
                .ok_or_else(|| ConfigError::MissingCredential {
                    var: config.edge_config.token_env.clone(),
                })?;
            let client = EdgeConfigClient::new(http_client, &config.edge_config, token)?;
            Ok(Arc::new(client) as Arc<dyn IssueCache>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_config() -> Config {
        let mut config = Config::default();
        config.edge_config.edge_config_id = "ecfg_test".to_string();
        config
    }

    #[test]
    fn test_missing_store_token_is_config_error() {
        let cache = build_cache(&edge_config(), reqwest::Client::new(), &Credentials::default());

        assert_eq!(
            cache.err(),
            Some(ConfigError::MissingCredential {
                var: "VERCEL_API_KEY".to_string()
            })
        );
    }

    #[test]
    fn test_missing_edge_config_id_is_config_error() {
        let credentials = Credentials {
            store_token: Some("secret".to_string()),
            github_token: None,
        };
        let cache = build_cache(&Config::default(), reqwest::Client::new(), &credentials);

        assert_eq!(cache.err(), Some(ConfigError::MissingEdgeConfigId));
    }

    #[test]
    fn test_edge_config_backend_with_token() {
        let credentials = Credentials {
            store_token: Some("secret".to_string()),
            github_token: None,
        };
        let cache = build_cache(&edge_config(), reqwest::Client::new(), &credentials).unwrap();
        assert_eq!(cache.backend(), "edge_config");
    }

    #[test]
    fn test_memory_backend_needs_no_token() {
        let mut config = Config::default();
        config.cache.backend = CacheBackend::Memory;

        let cache = build_cache(&config, reqwest::Client::new(), &Credentials::default()).unwrap();
        assert_eq!(cache.backend(), "memory");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials {
            store_token: Some("super-secret".to_string()),
            github_token: None,
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
