use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, EdgeConfigSettings};
use crate::services::cache::{CacheError, IssueCache};

#[derive(Debug, Serialize)]
struct PatchItemsRequest<'a> {
    items: Vec<PatchItem<'a>>,
}

#[derive(Debug, Serialize)]
struct PatchItem<'a> {
    operation: &'static str,
    key: &'a str,
    value: &'a Value,
}

#[derive(Debug, Deserialize)]
struct EdgeConfigItem {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: Value,
}

/// Client for the Vercel Edge Config REST API.
#[derive(Clone)]
pub struct EdgeConfigClient {
    client: Client,
    api_url: String,
    edge_config_id: String,
    team_id: Option<String>,
    token: String,
}

impl EdgeConfigClient {
    /// The bearer token is injected here; the caller decides where it comes from.
    pub fn new(
        client: Client,
        settings: &EdgeConfigSettings,
        token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let edge_config_id = settings.edge_config_id.trim();
        if edge_config_id.is_empty() {
            return Err(ConfigError::MissingEdgeConfigId);
        }

        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                var: settings.token_env.clone(),
            });
        }

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            edge_config_id: edge_config_id.to_string(),
            team_id: settings.team_id.clone().filter(|t| !t.is_empty()),
            token,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, CacheError> {
        let mut url = Url::parse(&self.api_url)?;
        url.path_segments_mut()
            .map_err(|()| CacheError::Request(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(["v1", "edge-config", self.edge_config_id.as_str()])
            .extend(segments);

        if let Some(team_id) = &self.team_id {
            url.query_pairs_mut().append_pair("teamId", team_id);
        }

        Ok(url)
    }

    fn items_url(&self) -> Result<Url, CacheError> {
        self.url(&["items"])
    }

    fn item_url(&self, key: &str) -> Result<Url, CacheError> {
        self.url(&["item", key])
    }

    /// Sends a single `update` operation for `key`.
    pub async fn update_item(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        let body = PatchItemsRequest {
            items: vec![PatchItem {
                operation: "update",
                key,
                value,
            }],
        };

        let response = self
            .client
            .patch(self.items_url()?)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(CacheError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("Edge Config update for '{}' returned {}: {}", key, status, text);
        Ok(())
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let response = self
            .client
            .get(self.item_url(key)?)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Edge Config item '{}' not found", key);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let item: EdgeConfigItem = response.json().await?;
        debug!("Read Edge Config item '{}'", item.key);
        Ok(Some(item.value))
    }
}

#[async_trait::async_trait]
impl IssueCache for EdgeConfigClient {
    fn backend(&self) -> &'static str {
        "edge_config"
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        self.update_item(key, value).await
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, CacheError> {
        self.get_item(key).await
    }
}
