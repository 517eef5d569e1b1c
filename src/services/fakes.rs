//! In-process stand-ins for the upstream search and the cache store.

use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::cache::{CacheError, IssueCache};
use super::fetcher::{FetchError, IssueSource};
use crate::models::{IssueRecord, SearchResult};

pub fn issue(number: u64) -> IssueRecord {
    IssueRecord::new(json!({
        "number": number,
        "title": format!("Issue #{number}"),
        "body": format!("Body of issue {number}"),
        "state": "open",
        "html_url": format!("https://github.com/calcom/cal.com/issues/{number}"),
        "comments": 0,
        "user": {
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat"
        },
        "labels": []
    }))
}

pub struct StaticSource {
    response: Result<SearchResult, FetchError>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn items(items: Vec<IssueRecord>) -> Self {
        Self {
            response: Ok(SearchResult::from_items(items)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn error(err: FetchError) -> Self {
        Self {
            response: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IssueSource for StaticSource {
    async fn search_open_issues(&self) -> Result<SearchResult, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// A store whose writes always fail and whose reads return a fixed value.
pub struct FailingCache {
    pub stored: Option<Value>,
}

#[async_trait::async_trait]
impl IssueCache for FailingCache {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn write(&self, _key: &str, _value: &Value) -> Result<(), CacheError> {
        Err(CacheError::Status {
            status: 500,
            body: "store unavailable".to_string(),
        })
    }

    async fn read(&self, _key: &str) -> Result<Option<Value>, CacheError> {
        Ok(self.stored.clone())
    }
}
