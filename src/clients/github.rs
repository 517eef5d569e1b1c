use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::GitHubConfig;
use crate::constants;
use crate::models::SearchResult;
use crate::services::fetcher::{FetchError, IssueSource};

/// Thin client for the GitHub issue search endpoint.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    query: String,
    token: Option<String>,
}

impl GitHubClient {
    #[must_use]
    pub fn new(client: Client, config: &GitHubConfig, token: Option<String>) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            query: config.search_query(),
            token,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    fn search_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}/search/issues", self.api_url))?;
        url.query_pairs_mut().append_pair("q", &self.query);
        Ok(url)
    }

    /// First page of results only; the upstream default page size applies.
    pub async fn search_issues(&self) -> Result<SearchResult, FetchError> {
        let url = self
            .search_url()
            .map_err(|e| FetchError::Unexpected(format!("Invalid GitHub URL: {e}")))?;

        debug!("Searching GitHub issues: {}", self.query);

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, constants::github::ACCEPT)
            .header("X-GitHub-Api-Version", constants::github::API_VERSION);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            warn!(remaining = %remaining, "GitHub rate limit exceeded");
            return Err(FetchError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub search failed: {} - {}", status, body);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let result: SearchResult = response.json().await?;
        debug!(
            "GitHub search returned {} of {} issues",
            result.items.len(),
            result.total_count
        );

        Ok(result)
    }
}

#[async_trait::async_trait]
impl IssueSource for GitHubClient {
    async fn search_open_issues(&self) -> Result<SearchResult, FetchError> {
        self.search_issues().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(api_url: &str) -> GitHubClient {
        let config = GitHubConfig {
            api_url: api_url.to_string(),
            ..GitHubConfig::default()
        };
        GitHubClient::new(Client::new(), &config, None)
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client = client_for("https://api.github.com/");
        let url = client.search_url().unwrap();

        assert_eq!(url.path(), "/search/issues");
        let (name, value) = url.query_pairs().next().unwrap();
        assert_eq!(name, "q");
        assert_eq!(value, "is:issue repo:calcom/cal.com state:open");
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_no_pagination_parameters() {
        let client = client_for("https://api.github.com");
        let url = client.search_url().unwrap();

        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn test_invalid_base_url() {
        let client = client_for("not a url");
        assert!(client.search_url().is_err());
    }
}
